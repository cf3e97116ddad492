use crate::indicator::utils::close_prices;
use crate::indicator::{IndicatorKey, IndicatorValues, TABuilder};
use crate::model::Candle;
use std::marker::PhantomData;

/// 과매수 기준값
pub const OVERBOUGHT: f64 = 70.0;
/// 과매도 기준값
pub const OVERSOLD: f64 = 30.0;

const EPSILON: f64 = 0.000001;

/// 평균 상승폭/하락폭으로 RSI 값 계산
///
/// 상승도 하락도 없으면 중립값 50을 반환합니다.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss < EPSILON {
        if avg_gain < EPSILON {
            return 50.0;
        }
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Wilder 평활화 RSI 시계열 계산
///
/// 인덱스 `period`에서 첫 `period`개 변화량의 단순평균으로 시작하고,
/// 이후로는 `(prev * (period - 1) + current) / period`로 갱신합니다.
fn calculate_rsi(values: &[f64], period: usize) -> IndicatorValues {
    let mut result = vec![None; values.len()];
    if values.len() < period + 1 {
        return result;
    }

    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());

    // 가격 변화량 계산 (gains[i]는 values[i + 1] - values[i])
    for i in 1..values.len() {
        let change = values[i] - values[i - 1];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    // 첫 번째 평균 게인/로스 계산
    let mut avg_gain = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss = losses.iter().take(period).sum::<f64>() / period as f64;
    result[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    let smoothing = (period - 1) as f64;
    for i in period..gains.len() {
        avg_gain = (avg_gain * smoothing + gains[i]) / period as f64;
        avg_loss = (avg_loss * smoothing + losses[i]) / period as f64;
        result[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// RSI 값이 과매수 상태인지 확인
pub fn is_overbought(value: f64) -> bool {
    value > OVERBOUGHT
}

/// RSI 값이 과매도 상태인지 확인
pub fn is_oversold(value: f64) -> bool {
    value < OVERSOLD
}

/// 상대강도지수(RSI) 기술적 지표 빌더
///
/// RSI는 가격 변동의 상대적 강도를 측정하여 과매수/과매도 상태를 판단합니다.
/// 인덱스 `i < period` 위치는 `None`입니다.
#[derive(Debug)]
pub struct RSIBuilder<C: Candle> {
    /// RSI 계산 기간
    period: usize,
    _phantom: PhantomData<C>,
}

impl<C> RSIBuilder<C>
where
    C: Candle,
{
    /// 새 RSI 빌더 생성
    ///
    /// # Arguments
    /// * `period` - RSI 계산 기간 (일반적으로 14)
    ///
    /// # Panics
    /// * 유효하지 않은 기간이 제공되면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("RSI 기간은 0보다 커야 합니다");
        }

        Self {
            period,
            _phantom: PhantomData,
        }
    }

    /// 데이터 벡터에서 RSI 시계열 생성
    pub fn build(&self, data: &[C]) -> IndicatorValues {
        calculate_rsi(&close_prices(data), self.period)
    }
}

impl<C> TABuilder<C> for RSIBuilder<C>
where
    C: Candle,
{
    fn keys(&self) -> Vec<IndicatorKey> {
        vec![IndicatorKey::Rsi(self.period)]
    }

    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)> {
        vec![(IndicatorKey::Rsi(self.period), RSIBuilder::build(self, data))]
    }
}
