use crate::indicator::utils::{close_prices, moving_average};
use crate::indicator::{IndicatorKey, IndicatorValues, TABuilder};
use crate::model::Candle;
use std::marker::PhantomData;

/// MACD 계산 결과 (라인, 시그널, 히스토그램)
#[derive(Debug, Clone, PartialEq)]
pub struct MACDSeries {
    /// MACD 라인 (빠른 EMA - 느린 EMA)
    pub macd_line: IndicatorValues,
    /// 시그널 라인 (MACD 라인의 EMA)
    pub signal_line: IndicatorValues,
    /// 히스토그램 (MACD - 시그널)
    pub histogram: IndicatorValues,
}

/// MACD 계산 함수 (전체 데이터에서 계산)
///
/// MACD 라인은 느린 EMA가 정의되는 인덱스 `slow_period - 1`부터,
/// 시그널과 히스토그램은 그로부터 `signal_period - 1`개 뒤부터 존재합니다.
fn calculate_macd(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MACDSeries {
    let fast = moving_average::ema_series(values, fast_period);
    let slow = moving_average::ema_series(values, slow_period);

    let macd_line: IndicatorValues = fast
        .iter()
        .zip(slow.iter())
        .map(|(fast, slow)| match (fast, slow) {
            (Some(fast), Some(slow)) => Some(fast - slow),
            _ => None,
        })
        .collect();

    let signal_line = moving_average::ema_of_defined(&macd_line, signal_period);

    let histogram = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(macd, signal)| match (macd, signal) {
            (Some(macd), Some(signal)) => Some(macd - signal),
            _ => None,
        })
        .collect();

    MACDSeries {
        macd_line,
        signal_line,
        histogram,
    }
}

/// MACD(Moving Average Convergence Divergence) 계산을 위한 빌더
///
/// MACD는 두 개의 이동평균선(빠른 EMA와 느린 EMA)의 차이를 계산하고,
/// 이 값에 대한 시그널 라인(MACD의 EMA)을 제공하는 기술적 지표입니다.
#[derive(Debug)]
pub struct MACDBuilder<C: Candle> {
    /// 빠른 EMA 기간 (일반적으로 12)
    fast_period: usize,
    /// 느린 EMA 기간 (일반적으로 26)
    slow_period: usize,
    /// 시그널 라인 기간 (일반적으로 9)
    signal_period: usize,
    _phantom: PhantomData<C>,
}

impl<C> MACDBuilder<C>
where
    C: Candle,
{
    /// 새 MACD 빌더 생성
    ///
    /// # Arguments
    /// * `fast_period` - 빠른 EMA 기간 (기본값 12)
    /// * `slow_period` - 느린 EMA 기간 (기본값 26)
    /// * `signal_period` - 시그널 라인 기간 (기본값 9)
    ///
    /// # Panics
    /// * 유효하지 않은 기간이 제공되면 패닉 발생
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        if fast_period == 0 || slow_period == 0 || signal_period == 0 {
            panic!("MACD 기간은 0보다 커야 합니다");
        }

        if fast_period >= slow_period {
            panic!("빠른 기간은 느린 기간보다 작아야 합니다");
        }

        Self {
            fast_period,
            slow_period,
            signal_period,
            _phantom: PhantomData,
        }
    }

    /// 데이터 벡터에서 MACD 시계열 생성
    pub fn build(&self, data: &[C]) -> MACDSeries {
        calculate_macd(
            &close_prices(data),
            self.fast_period,
            self.slow_period,
            self.signal_period,
        )
    }
}

impl<C> TABuilder<C> for MACDBuilder<C>
where
    C: Candle,
{
    fn keys(&self) -> Vec<IndicatorKey> {
        vec![
            IndicatorKey::MacdLine,
            IndicatorKey::MacdSignal,
            IndicatorKey::MacdHistogram,
        ]
    }

    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)> {
        let series = MACDBuilder::build(self, data);
        vec![
            (IndicatorKey::MacdLine, series.macd_line),
            (IndicatorKey::MacdSignal, series.signal_line),
            (IndicatorKey::MacdHistogram, series.histogram),
        ]
    }
}
