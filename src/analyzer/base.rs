use crate::candle_series::CandleSeries;
use crate::error::{SignalError, SignalResult};
use crate::indicator::utils::{max_defined, min_defined};
use crate::indicator::{IndicatorKey, IndicatorSet};
use crate::model::Candle;

/// 규칙 평가에 필요한 최소 캔들 수
pub const MIN_CANDLES: usize = 3;

/// 규칙 평가 컨텍스트
///
/// 지표가 계산된 시계열에서 가격 열과 지표 컬렉션을 꺼내
/// 최신 봉과 직전 봉들에 대한 조회를 제공합니다.
/// 캔들 타입과 무관하게 하나의 규칙 테이블로 평가할 수 있도록 제네릭이 아닙니다.
#[derive(Debug)]
pub struct RuleContext<'a> {
    highs: Vec<f64>,
    lows: Vec<f64>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
    indicators: &'a IndicatorSet,
}

impl<'a> RuleContext<'a> {
    /// 지표가 계산된 시계열로부터 컨텍스트 생성
    ///
    /// # Returns
    /// * `SignalResult<RuleContext>` - 캔들이 3개 미만이면 `InsufficientData`,
    ///   지표가 계산되지 않았으면 `InvalidInput`
    pub fn new<C: Candle>(series: &'a CandleSeries<C>) -> SignalResult<Self> {
        if series.len() < MIN_CANDLES {
            return Err(SignalError::InsufficientData {
                required: MIN_CANDLES,
                actual: series.len(),
            });
        }

        let indicators = series.indicators().ok_or_else(|| {
            SignalError::InvalidInput("지표가 계산되지 않은 시계열입니다".to_string())
        })?;

        let candles = series.candles();
        Ok(RuleContext {
            highs: candles.iter().map(|c| c.high_price()).collect(),
            lows: candles.iter().map(|c| c.low_price()).collect(),
            closes: candles.iter().map(|c| c.close_price()).collect(),
            volumes: candles.iter().map(|c| c.volume()).collect(),
            indicators,
        })
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// 최신 봉 인덱스
    pub fn latest(&self) -> usize {
        self.len() - 1
    }

    /// 직전 봉 인덱스
    pub fn prev1(&self) -> usize {
        self.len() - 2
    }

    /// 두 봉 전 인덱스
    pub fn prev2(&self) -> usize {
        self.len() - 3
    }

    pub fn high(&self, index: usize) -> f64 {
        self.highs[index]
    }

    pub fn low(&self, index: usize) -> f64 {
        self.lows[index]
    }

    pub fn close(&self, index: usize) -> f64 {
        self.closes[index]
    }

    pub fn volume(&self, index: usize) -> f64 {
        self.volumes[index]
    }

    /// 지정된 지표와 인덱스의 값 (룩백 부족이면 `None`)
    pub fn indicator(&self, key: IndicatorKey, index: usize) -> Option<f64> {
        self.indicators.value(&key, index)
    }

    /// 최신 봉과 직전 봉의 지표 값 쌍
    ///
    /// 둘 중 하나라도 비어 있으면 `None`입니다.
    pub fn latest_pair(&self, key: IndicatorKey) -> Option<(f64, f64)> {
        Some((
            self.indicator(key, self.latest())?,
            self.indicator(key, self.prev1())?,
        ))
    }

    /// 최신 봉을 포함한 최근 `count`개 고가 중 최댓값
    pub fn recent_high(&self, count: usize) -> f64 {
        tail(&self.highs, count)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// 최신 봉을 포함한 최근 `count`개 저가 중 최솟값
    pub fn recent_low(&self, count: usize) -> f64 {
        tail(&self.lows, count)
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// 최신 봉 직전 `count`개 고가 중 최댓값
    ///
    /// 최신 봉 앞에 `count`개가 없으면 `None`입니다.
    pub fn preceding_high(&self, count: usize) -> Option<f64> {
        preceding(&self.highs, count).map(|window| {
            window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// 최신 봉 직전 `count`개 저가 중 최솟값
    ///
    /// 최신 봉 앞에 `count`개가 없으면 `None`입니다.
    pub fn preceding_low(&self, count: usize) -> Option<f64> {
        preceding(&self.lows, count)
            .map(|window| window.iter().copied().fold(f64::INFINITY, f64::min))
    }

    /// 최신 봉을 포함한 최근 `count`개 지표 값 중 최댓값 (빈 값 제외)
    pub fn recent_indicator_max(&self, key: IndicatorKey, count: usize) -> Option<f64> {
        self.indicators
            .get(&key)
            .and_then(|values| max_defined(tail(values, count)))
    }

    /// 최신 봉을 포함한 최근 `count`개 지표 값 중 최솟값 (빈 값 제외)
    pub fn recent_indicator_min(&self, key: IndicatorKey, count: usize) -> Option<f64> {
        self.indicators
            .get(&key)
            .and_then(|values| min_defined(tail(values, count)))
    }
}

/// 마지막 `count`개 (부족하면 전체)
fn tail<T>(values: &[T], count: usize) -> &[T] {
    &values[values.len().saturating_sub(count)..]
}

/// 마지막 원소 앞의 `count`개
fn preceding<T>(values: &[T], count: usize) -> Option<&[T]> {
    let end = values.len().checked_sub(1)?;
    let start = end.checked_sub(count)?;
    Some(&values[start..end])
}
