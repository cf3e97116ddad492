use crate::indicator::IndicatorValues;
use crate::model::Candle;

/// 공통 이동평균 계산 함수들
pub mod moving_average {
    use crate::indicator::IndicatorValues;

    /// 지수이동평균(EMA) 계산을 위한 알파값 계산
    ///
    /// # Arguments
    /// * `period` - EMA 기간
    ///
    /// # Returns
    /// * `f64` - 알파값 (평활화 계수)
    pub fn calculate_ema_alpha(period: usize) -> f64 {
        2.0 / (period + 1) as f64
    }

    /// 지수이동평균(EMA) 한 스텝 계산
    ///
    /// # Arguments
    /// * `current_price` - 현재 가격
    /// * `previous_ema` - 이전 EMA 값
    /// * `alpha` - 평활화 계수
    ///
    /// # Returns
    /// * `f64` - 계산된 EMA 값
    pub fn calculate_ema_step(current_price: f64, previous_ema: f64, alpha: f64) -> f64 {
        alpha * current_price + (1.0 - alpha) * previous_ema
    }

    /// 단순이동평균(SMA) 시계열 계산
    ///
    /// 인덱스 `i < period - 1` 위치는 `None`입니다.
    ///
    /// # Arguments
    /// * `values` - 입력 값 배열
    /// * `period` - 계산 기간
    pub fn sma_series(values: &[f64], period: usize) -> IndicatorValues {
        let mut result = vec![None; values.len()];
        if period == 0 || values.len() < period {
            return result;
        }

        let mut window_sum: f64 = values[..period].iter().sum();
        result[period - 1] = Some(window_sum / period as f64);

        for i in period..values.len() {
            window_sum += values[i] - values[i - period];
            result[i] = Some(window_sum / period as f64);
        }

        result
    }

    /// 지수이동평균(EMA) 시계열 계산
    ///
    /// 처음 `period`개 값의 단순평균으로 시드를 잡고, 이후로는 `None` 없이 이어집니다.
    ///
    /// # Arguments
    /// * `values` - 입력 값 배열
    /// * `period` - EMA 기간
    pub fn ema_series(values: &[f64], period: usize) -> IndicatorValues {
        let mut result = vec![None; values.len()];
        if period == 0 || values.len() < period {
            return result;
        }

        let alpha = calculate_ema_alpha(period);
        let mut ema = values[..period].iter().sum::<f64>() / period as f64;
        result[period - 1] = Some(ema);

        for (i, &value) in values.iter().enumerate().skip(period) {
            ema = calculate_ema_step(value, ema, alpha);
            result[i] = Some(ema);
        }

        result
    }

    /// 앞부분이 비어 있는 시계열에 대한 EMA 계산
    ///
    /// 첫 번째 정의된 값부터 연속으로 정의되어 있다고 가정하고,
    /// 그 구간에 [`ema_series`]를 적용한 뒤 원래 위치에 맞춰 돌려놓습니다.
    pub fn ema_of_defined(values: &[Option<f64>], period: usize) -> IndicatorValues {
        let mut result = vec![None; values.len()];
        let Some(start) = values.iter().position(|value| value.is_some()) else {
            return result;
        };

        let defined: Vec<f64> = values[start..].iter().map_while(|value| *value).collect();
        for (offset, value) in ema_series(&defined, period).into_iter().enumerate() {
            result[start + offset] = value;
        }

        result
    }
}

/// 종가 배열 추출
pub fn close_prices<C: Candle>(data: &[C]) -> Vec<f64> {
    data.iter().map(|candle| candle.close_price()).collect()
}

/// 거래량 배열 추출
pub fn volumes<C: Candle>(data: &[C]) -> Vec<f64> {
    data.iter().map(|candle| candle.volume()).collect()
}

/// 비어 있는 값을 건너뛰고 최댓값 계산
///
/// 모든 값이 비어 있으면 `None`을 반환합니다.
pub fn max_defined(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::max)
}

/// 비어 있는 값을 건너뛰고 최솟값 계산
///
/// 모든 값이 비어 있으면 `None`을 반환합니다.
pub fn min_defined(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::min)
}

/// 길이만 맞춘 빈 지표 시계열
pub fn empty_values(len: usize) -> IndicatorValues {
    vec![None; len]
}
