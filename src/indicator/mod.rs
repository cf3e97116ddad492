// 기술적 지표 모듈
// 캔들 시계열 전체에 대해 위치가 정렬된 지표 시계열을 계산합니다.

pub mod atr;
pub mod bband;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod utils;
pub mod volume;

use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;

use crate::candle_series::CandleSeries;
use crate::model::Candle;
use atr::ATRBuilder;
use bband::BollingerBandsBuilder;
use ma::EMABuilder;
use macd::MACDBuilder;
use rsi::RSIBuilder;
use volume::{OBVBuilder, VolumeMABuilder};

/// 캔들 인덱스별 지표 값 (룩백이 채워지지 않은 위치는 `None`)
pub type IndicatorValues = Vec<Option<f64>>;

/// 계산되는 지표 시계열의 이름
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKey {
    /// 지수이동평균
    Ema(usize),
    /// 상대강도지수
    Rsi(usize),
    /// MACD 라인
    MacdLine,
    /// MACD 시그널 라인
    MacdSignal,
    /// MACD 히스토그램
    MacdHistogram,
    /// 볼린저밴드 상단
    BBandUpper,
    /// 볼린저밴드 중심선
    BBandMiddle,
    /// 볼린저밴드 하단
    BBandLower,
    /// 거래량 이동평균
    VolumeMa(usize),
    /// 누적 거래량 (On-Balance Volume)
    Obv,
    /// 평균 실제 범위
    Atr(usize),
}

impl Display for IndicatorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndicatorKey::Ema(period) => write!(f, "EMA_{}", period),
            IndicatorKey::Rsi(period) => write!(f, "RSI_{}", period),
            IndicatorKey::MacdLine => write!(f, "MACD"),
            IndicatorKey::MacdSignal => write!(f, "MACD_signal"),
            IndicatorKey::MacdHistogram => write!(f, "MACD_hist"),
            IndicatorKey::BBandUpper => write!(f, "BB_upper"),
            IndicatorKey::BBandMiddle => write!(f, "BB_middle"),
            IndicatorKey::BBandLower => write!(f, "BB_lower"),
            IndicatorKey::VolumeMa(period) => write!(f, "Volume_MA_{}", period),
            IndicatorKey::Obv => write!(f, "OBV"),
            IndicatorKey::Atr(period) => write!(f, "ATR_{}", period),
        }
    }
}

/// 지표 시계열 컬렉션
///
/// 키 순서를 유지하며, 모든 시계열의 길이는 캔들 수와 같습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    /// 순서가 유지되는 키 목록
    keys: Vec<IndicatorKey>,
    /// 키별 지표 시계열
    data: HashMap<IndicatorKey, IndicatorValues>,
}

impl IndicatorSet {
    /// 빈 컬렉션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 지표 시계열 추가 (같은 키가 있으면 교체)
    pub fn insert(&mut self, key: IndicatorKey, values: IndicatorValues) {
        if self.data.insert(key, values).is_none() {
            self.keys.push(key);
        }
    }

    /// 키 목록 참조 반환
    pub fn keys(&self) -> &[IndicatorKey] {
        &self.keys
    }

    /// 지정된 키의 시계열 반환
    pub fn get(&self, key: &IndicatorKey) -> Option<&[Option<f64>]> {
        self.data.get(key).map(|values| values.as_slice())
    }

    /// 지정된 키와 인덱스의 값 반환
    ///
    /// 키가 없거나 해당 위치의 룩백이 채워지지 않았으면 `None`입니다.
    pub fn value(&self, key: &IndicatorKey, index: usize) -> Option<f64> {
        self.data
            .get(key)
            .and_then(|values| values.get(index).copied().flatten())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// 지표 계산 인터페이스
///
/// 시간 오름차순 캔들 전체를 받아 하나 이상의 위치 정렬 시계열을 만듭니다.
pub trait TABuilder<C: Candle>: Send + Debug {
    /// 이 빌더가 만드는 키 목록
    fn keys(&self) -> Vec<IndicatorKey>;

    /// 캔들 데이터에서 지표 시계열 생성
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 데이터
    ///
    /// # Returns
    /// * `Vec<(IndicatorKey, IndicatorValues)>` - 키별 시계열 (각각 `data.len()` 길이)
    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)>;
}

/// 여러 지표 빌더를 관리하는 구조체
pub struct IndicatorsBuilder<C: Candle> {
    builders: Vec<Box<dyn TABuilder<C>>>,
}

impl<C: Candle + 'static> IndicatorsBuilder<C> {
    /// 빈 빌더 생성
    pub fn new() -> Self {
        IndicatorsBuilder { builders: vec![] }
    }

    /// 빌더 추가
    pub fn with(mut self, builder: Box<dyn TABuilder<C>>) -> Self {
        self.builders.push(builder);
        self
    }

    /// 신호 규칙이 사용하는 표준 지표 세트
    ///
    /// EMA(20, 50, 200), RSI(14), MACD(12, 26, 9), 볼린저밴드(20, 2σ),
    /// 거래량 MA(20), OBV, ATR(14)
    pub fn standard() -> Self {
        Self::new()
            .with(Box::new(EMABuilder::<C>::new(20)))
            .with(Box::new(EMABuilder::<C>::new(50)))
            .with(Box::new(EMABuilder::<C>::new(200)))
            .with(Box::new(RSIBuilder::<C>::new(14)))
            .with(Box::new(MACDBuilder::<C>::new(12, 26, 9)))
            .with(Box::new(BollingerBandsBuilder::<C>::new(20, 2.0)))
            .with(Box::new(VolumeMABuilder::<C>::new(20)))
            .with(Box::new(OBVBuilder::<C>::new()))
            .with(Box::new(ATRBuilder::<C>::new(14)))
    }

    /// 모든 빌더를 실행하여 지표 컬렉션 생성
    pub fn build(&self, data: &[C]) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        for builder in &self.builders {
            for (key, values) in builder.build(data) {
                debug_assert_eq!(values.len(), data.len(), "{} 길이 불일치", key);
                set.insert(key, values);
            }
        }
        set
    }
}

impl<C: Candle + 'static> Default for IndicatorsBuilder<C> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<C: Candle> std::fmt::Debug for IndicatorsBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorsBuilder")
            .field("builders", &format!("<{} builders>", self.builders.len()))
            .finish()
    }
}

/// 캔들 시계열에 표준 지표를 한 번에 계산하여 붙입니다.
///
/// 캔들이 1개 이상인 모든 시계열에 대해 실패하지 않으며,
/// 짧은 시계열에서는 룩백이 부족한 위치가 `None`으로 채워집니다.
pub fn annotate<C: Candle + 'static>(series: CandleSeries<C>) -> CandleSeries<C> {
    let indicators = IndicatorsBuilder::<C>::standard().build(series.candles());
    log::debug!(
        "지표 계산 완료: 캔들 {}개, 지표 {}개",
        series.len(),
        indicators.len()
    );
    series.with_indicators(indicators)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_key_names() {
        assert_eq!(IndicatorKey::Ema(20).to_string(), "EMA_20");
        assert_eq!(IndicatorKey::Rsi(14).to_string(), "RSI_14");
        assert_eq!(IndicatorKey::MacdHistogram.to_string(), "MACD_hist");
        assert_eq!(IndicatorKey::VolumeMa(20).to_string(), "Volume_MA_20");
        assert_eq!(IndicatorKey::Atr(14).to_string(), "ATR_14");
    }

    #[test]
    fn test_indicator_set_keeps_insertion_order() {
        let mut set = IndicatorSet::new();
        set.insert(IndicatorKey::Obv, vec![Some(0.0)]);
        set.insert(IndicatorKey::Ema(20), vec![None]);
        set.insert(IndicatorKey::Obv, vec![Some(1.0)]);

        assert_eq!(set.keys(), &[IndicatorKey::Obv, IndicatorKey::Ema(20)]);
        assert_eq!(set.value(&IndicatorKey::Obv, 0), Some(1.0));
        assert_eq!(set.value(&IndicatorKey::Ema(20), 0), None);
        assert_eq!(set.value(&IndicatorKey::Rsi(14), 0), None);
    }
}
