use chrono::{Duration, TimeZone, Utc};

use crate::model::OhlcvCandle;

/// 기준 시각에서 `index`주 뒤의 캔들 생성
pub(crate) fn candle_at(
    index: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
) -> OhlcvCandle {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("유효한 기준 시각");
    OhlcvCandle::new(
        base + Duration::weeks(index),
        open,
        high,
        low,
        close,
        volume,
    )
}

/// 종가 배열로 캔들 생성 (시가 = 직전 종가, 고가/저가는 ±0.5)
pub(crate) fn candles_from_closes(closes: &[f64]) -> Vec<OhlcvCandle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            candle_at(
                i as i64,
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                10.0,
            )
        })
        .collect()
}

/// 고가/저가/종가/거래량이 모두 일정한 횡보 캔들
pub(crate) fn flat_candles(count: usize) -> Vec<OhlcvCandle> {
    (0..count)
        .map(|i| candle_at(i as i64, 100.0, 101.0, 99.0, 100.0, 10.0))
        .collect()
}

/// 꾸준히 하락하다 마지막 두 봉에서 거래량이 급증하는 25봉 시계열
pub(crate) fn breakdown_candles() -> Vec<OhlcvCandle> {
    let closes: Vec<f64> = (0..25).map(|i| 100.0 - i as f64 * 50.0 / 24.0).collect();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let volume = match i {
                23 => 20.0,
                24 => 40.0,
                _ => 10.0,
            };
            candle_at(i as i64, open, open + 0.5, close - 0.5, close, volume)
        })
        .collect()
}
