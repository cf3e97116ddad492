use crate::indicator::{IndicatorKey, IndicatorValues, TABuilder};
use crate::model::Candle;
use std::marker::PhantomData;

/// True Range 계산
///
/// 첫 캔들은 직전 종가가 없으므로 고가 - 저가만 사용합니다.
fn true_range<C: Candle>(current: &C, prev: Option<&C>) -> f64 {
    let high_low = current.high_price() - current.low_price();
    match prev {
        Some(prev) => {
            let high_close = (current.high_price() - prev.close_price()).abs();
            let low_close = (current.low_price() - prev.close_price()).abs();
            high_low.max(high_close).max(low_close)
        }
        None => high_low,
    }
}

/// Wilder 평활화 ATR 시계열 계산
///
/// 인덱스 `period`에서 `TR[1..=period]`의 평균으로 시작하고
/// 이후로는 `(prev * (period - 1) + TR) / period`로 갱신합니다.
fn calculate_atr<C: Candle>(data: &[C], period: usize) -> IndicatorValues {
    let mut result = vec![None; data.len()];
    if data.len() < period + 1 {
        return result;
    }

    let ranges: Vec<f64> = data
        .iter()
        .enumerate()
        .map(|(i, candle)| true_range(candle, i.checked_sub(1).map(|p| &data[p])))
        .collect();

    let mut atr = ranges[1..=period].iter().sum::<f64>() / period as f64;
    result[period] = Some(atr);

    for i in (period + 1)..data.len() {
        atr = (atr * (period - 1) as f64 + ranges[i]) / period as f64;
        result[i] = Some(atr);
    }

    result
}

/// ATR(Average True Range) 빌더
///
/// 변동성 측정 지표로, 인덱스 `i < period` 위치는 `None`입니다.
#[derive(Debug)]
pub struct ATRBuilder<C: Candle> {
    /// ATR 계산 기간
    period: usize,
    _phantom: PhantomData<C>,
}

impl<C> ATRBuilder<C>
where
    C: Candle,
{
    /// 새 ATR 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("ATR 기간은 0보다 커야 합니다");
        }

        ATRBuilder {
            period,
            _phantom: PhantomData,
        }
    }

    pub fn build(&self, data: &[C]) -> IndicatorValues {
        calculate_atr(data, self.period)
    }
}

impl<C> TABuilder<C> for ATRBuilder<C>
where
    C: Candle,
{
    fn keys(&self) -> Vec<IndicatorKey> {
        vec![IndicatorKey::Atr(self.period)]
    }

    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)> {
        vec![(IndicatorKey::Atr(self.period), ATRBuilder::build(self, data))]
    }
}
