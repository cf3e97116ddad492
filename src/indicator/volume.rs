use crate::indicator::utils::{moving_average, volumes};
use crate::indicator::{IndicatorKey, IndicatorValues, TABuilder};
use crate::model::Candle;
use std::marker::PhantomData;

/// 거래량 이동평균 빌더
///
/// `period` 기간 거래량의 단순평균이며, 인덱스 `i < period - 1` 위치는 `None`입니다.
#[derive(Debug)]
pub struct VolumeMABuilder<C: Candle> {
    /// 계산 기간
    period: usize,
    _phantom: PhantomData<C>,
}

impl<C> VolumeMABuilder<C>
where
    C: Candle,
{
    /// 새 거래량 이동평균 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("볼륨 계산 기간은 0보다 커야 합니다");
        }

        VolumeMABuilder {
            period,
            _phantom: PhantomData,
        }
    }

    pub fn build(&self, data: &[C]) -> IndicatorValues {
        moving_average::sma_series(&volumes(data), self.period)
    }
}

impl<C> TABuilder<C> for VolumeMABuilder<C>
where
    C: Candle,
{
    fn keys(&self) -> Vec<IndicatorKey> {
        vec![IndicatorKey::VolumeMa(self.period)]
    }

    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)> {
        vec![(
            IndicatorKey::VolumeMa(self.period),
            VolumeMABuilder::build(self, data),
        )]
    }
}

/// OBV(On-Balance Volume) 빌더
///
/// 종가가 직전보다 오르면 거래량을 더하고, 내리면 빼고, 같으면 유지하는 누적합입니다.
/// 인덱스 0에서 0으로 시작하므로 비어 있는 위치가 없습니다.
#[derive(Debug, Default)]
pub struct OBVBuilder<C: Candle> {
    _phantom: PhantomData<C>,
}

impl<C> OBVBuilder<C>
where
    C: Candle,
{
    pub fn new() -> Self {
        OBVBuilder {
            _phantom: PhantomData,
        }
    }

    pub fn build(&self, data: &[C]) -> IndicatorValues {
        let mut result = Vec::with_capacity(data.len());
        let mut obv = 0.0;

        for (i, candle) in data.iter().enumerate() {
            if i > 0 {
                let prev_close = data[i - 1].close_price();
                let close = candle.close_price();
                if close > prev_close {
                    obv += candle.volume();
                } else if close < prev_close {
                    obv -= candle.volume();
                }
            }
            result.push(Some(obv));
        }

        result
    }
}

impl<C> TABuilder<C> for OBVBuilder<C>
where
    C: Candle,
{
    fn keys(&self) -> Vec<IndicatorKey> {
        vec![IndicatorKey::Obv]
    }

    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)> {
        vec![(IndicatorKey::Obv, OBVBuilder::build(self, data))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::candle_at;

    #[test]
    fn test_volume_ma() {
        let candles: Vec<_> = (0..5)
            .map(|i| candle_at(i, 100.0, 101.0, 99.0, 100.0, (i + 1) as f64 * 10.0))
            .collect();
        let ma = VolumeMABuilder::new(3).build(&candles);
        assert_eq!(ma, vec![None, None, Some(20.0), Some(30.0), Some(40.0)]);
    }

    #[test]
    fn test_obv_direction() {
        let candles = vec![
            candle_at(0, 10.0, 11.0, 9.0, 10.0, 100.0),
            candle_at(1, 10.0, 12.0, 9.0, 11.0, 50.0),
            candle_at(2, 11.0, 12.0, 9.0, 11.0, 70.0),
            candle_at(3, 11.0, 12.0, 8.0, 9.0, 30.0),
        ];
        let obv = OBVBuilder::new().build(&candles);
        assert_eq!(obv, vec![Some(0.0), Some(50.0), Some(50.0), Some(20.0)]);
    }
}
