use crate::error::{SignalError, SignalResult};
use crate::indicator::{self, IndicatorKey, IndicatorSet};
use crate::model::Candle;

/// 시간 오름차순 캔들 시계열
///
/// 생성 시 시간 순서와 값의 유효성을 검증하며, 이후로는 변경되지 않습니다.
/// 지표는 [`indicator::annotate`]로 한 번에 붙이고, 모든 지표 시계열은
/// 캔들 수와 같은 길이를 가집니다.
#[derive(Debug, Clone)]
pub struct CandleSeries<C: Candle> {
    candles: Vec<C>,
    indicators: Option<IndicatorSet>,
}

/// 캔들 하나의 가격/거래량 유효성 검사
fn validate_candle<C: Candle>(index: usize, candle: &C) -> SignalResult<()> {
    let fields = [
        ("open", candle.open_price()),
        ("high", candle.high_price()),
        ("low", candle.low_price()),
        ("close", candle.close_price()),
        ("volume", candle.volume()),
    ];

    for (name, value) in fields {
        if !value.is_finite() {
            return Err(SignalError::InvalidInput(format!(
                "캔들 {}의 {} 값이 유한하지 않습니다: {}",
                index, name, value
            )));
        }
        if value < 0.0 {
            return Err(SignalError::InvalidInput(format!(
                "캔들 {}의 {} 값이 음수입니다: {}",
                index, name, value
            )));
        }
    }

    Ok(())
}

impl<C> CandleSeries<C>
where
    C: Candle,
{
    /// 원시 캔들로 시계열 생성
    ///
    /// # Arguments
    /// * `candles` - 시간 오름차순 캔들 목록
    ///
    /// # Returns
    /// * `SignalResult<CandleSeries<C>>` - 시간이 엄격히 증가하지 않거나
    ///   음수/비유한 값이 있으면 `InvalidInput`
    pub fn new(candles: Vec<C>) -> SignalResult<Self> {
        for (i, candle) in candles.iter().enumerate() {
            validate_candle(i, candle)?;

            if i > 0 && candle.datetime() <= candles[i - 1].datetime() {
                return Err(SignalError::InvalidInput(format!(
                    "캔들 시간이 엄격히 증가하지 않습니다: index={}, {} <= {}",
                    i,
                    candle.datetime(),
                    candles[i - 1].datetime()
                )));
            }
        }

        log::trace!("캔들 시계열 생성: {}개", candles.len());
        Ok(CandleSeries {
            candles,
            indicators: None,
        })
    }

    /// 캔들 슬라이스 반환 (시간 오름차순)
    pub fn candles(&self) -> &[C] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 가장 최근 캔들
    pub fn latest(&self) -> Option<&C> {
        self.candles.last()
    }

    /// 지정된 인덱스의 캔들
    pub fn get(&self, index: usize) -> Option<&C> {
        self.candles.get(index)
    }

    /// 계산된 지표 컬렉션 (아직 계산되지 않았으면 `None`)
    pub fn indicators(&self) -> Option<&IndicatorSet> {
        self.indicators.as_ref()
    }

    pub fn is_annotated(&self) -> bool {
        self.indicators.is_some()
    }

    /// 지정된 지표와 인덱스의 값
    pub fn value(&self, key: &IndicatorKey, index: usize) -> Option<f64> {
        self.indicators
            .as_ref()
            .and_then(|indicators| indicators.value(key, index))
    }

    /// 지표를 붙인 새 시계열 반환
    pub(crate) fn with_indicators(self, indicators: IndicatorSet) -> Self {
        CandleSeries {
            candles: self.candles,
            indicators: Some(indicators),
        }
    }
}

impl<C> CandleSeries<C>
where
    C: Candle + 'static,
{
    /// 검증 후 표준 지표까지 계산된 시계열 생성
    pub fn annotated(candles: Vec<C>) -> SignalResult<Self> {
        Ok(indicator::annotate(Self::new(candles)?))
    }
}
