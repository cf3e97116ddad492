use crate::indicator::utils::{close_prices, moving_average};
use crate::indicator::{IndicatorKey, IndicatorValues, TABuilder};
use crate::model::Candle;
use std::marker::PhantomData;

/// 볼린저밴드 계산 결과
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBandsSeries {
    pub upper: IndicatorValues,
    pub middle: IndicatorValues,
    pub lower: IndicatorValues,
}

/// 모집단 표준편차 계산
fn calculate_standard_deviation(values: &[f64], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// 볼린저밴드 계산 빌더
///
/// 중심선은 `period` 기간 종가 SMA, 상/하단은 중심선 ± `multiplier` × 모집단 표준편차입니다.
/// 인덱스 `i < period - 1` 위치는 `None`입니다.
#[derive(Debug)]
pub struct BollingerBandsBuilder<C: Candle> {
    period: usize,
    multiplier: f64,
    _phantom: PhantomData<C>,
}

impl<C> BollingerBandsBuilder<C>
where
    C: Candle,
{
    /// 새 볼린저밴드 빌더 생성
    ///
    /// # Arguments
    /// * `period` - 이동평균 기간 (일반적으로 20)
    /// * `multiplier` - 표준편차 승수 (일반적으로 2.0)
    ///
    /// # Panics
    /// * 기간이 0이거나 승수가 0 이하이면 패닉 발생
    pub fn new(period: usize, multiplier: f64) -> Self {
        if period == 0 {
            panic!("볼린저밴드 기간은 0보다 커야 합니다");
        }

        if multiplier <= 0.0 {
            panic!("볼린저밴드 승수는 0보다 커야 합니다");
        }

        BollingerBandsBuilder {
            period,
            multiplier,
            _phantom: PhantomData,
        }
    }

    /// 데이터 벡터에서 볼린저밴드 시계열 생성
    pub fn build(&self, data: &[C]) -> BollingerBandsSeries {
        let closes = close_prices(data);
        let middle = moving_average::sma_series(&closes, self.period);

        let mut upper = vec![None; closes.len()];
        let mut lower = vec![None; closes.len()];

        for (i, mean) in middle.iter().enumerate() {
            let Some(mean) = *mean else {
                continue;
            };

            let window = &closes[i + 1 - self.period..=i];
            let std_dev = calculate_standard_deviation(window, mean);
            if !std_dev.is_finite() {
                log::warn!("볼린저밴드 표준편차 계산 실패: index={}", i);
                continue;
            }

            upper[i] = Some(mean + std_dev * self.multiplier);
            lower[i] = Some(mean - std_dev * self.multiplier);
        }

        BollingerBandsSeries {
            upper,
            middle,
            lower,
        }
    }
}

impl<C> TABuilder<C> for BollingerBandsBuilder<C>
where
    C: Candle,
{
    fn keys(&self) -> Vec<IndicatorKey> {
        vec![
            IndicatorKey::BBandUpper,
            IndicatorKey::BBandMiddle,
            IndicatorKey::BBandLower,
        ]
    }

    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)> {
        let bands = BollingerBandsBuilder::build(self, data);
        vec![
            (IndicatorKey::BBandUpper, bands.upper),
            (IndicatorKey::BBandMiddle, bands.middle),
            (IndicatorKey::BBandLower, bands.lower),
        ]
    }
}
