use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// 캔들 데이터 인터페이스
///
/// 지표 계산과 규칙 평가에 필요한 OHLCV 값을 제공합니다.
/// 엔진의 모든 타입은 이 트레이트에 대해 제네릭입니다.
pub trait Candle: Clone + Debug + Display + Send + Sync {
    /// 캔들 시작 시각
    fn datetime(&self) -> DateTime<Utc>;
    /// 시가
    fn open_price(&self) -> f64;
    /// 고가
    fn high_price(&self) -> f64;
    /// 저가
    fn low_price(&self) -> f64;
    /// 종가
    fn close_price(&self) -> f64;
    /// 거래량
    fn volume(&self) -> f64;
}

/// 기본 OHLCV 캔들
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvCandle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvCandle {
    /// 새 캔들 생성
    pub fn new(
        open_time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        OhlcvCandle {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Display for OhlcvCandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candle({}, o={:.2}, h={:.2}, l={:.2}, c={:.2}, v={:.2})",
            self.open_time.format("%Y-%m-%d %H:%M"),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume
        )
    }
}

impl Candle for OhlcvCandle {
    fn datetime(&self) -> DateTime<Utc> {
        self.open_time
    }

    fn open_price(&self) -> f64 {
        self.open
    }

    fn high_price(&self) -> f64 {
        self.high
    }

    fn low_price(&self) -> f64 {
        self.low
    }

    fn close_price(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// 온체인 지표 스냅샷
///
/// 평가 1회당 한 번 주어지며, 비어 있는 필드는 오류가 아니라
/// 해당 규칙의 "데이터 없음"으로 처리됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainMetrics {
    /// MVRV Z-Score
    pub mvrv_z_score: Option<f64>,
    /// (조정) SOPR
    pub sopr: Option<f64>,
}

impl ChainMetrics {
    pub fn new(mvrv_z_score: Option<f64>, sopr: Option<f64>) -> Self {
        ChainMetrics { mvrv_z_score, sopr }
    }

    /// 모든 필드가 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        self.mvrv_z_score.is_none() && self.sopr.is_none()
    }
}

/// 시장 국면 가설
///
/// 약세 전환(Bear)과 강세 전환(Bull)을 독립적으로 점수화합니다.
/// 규칙 테이블은 이 값을 극성으로 사용하여 비교 방향을 뒤집습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// 강세장 → 약세장 전환
    Bear,
    /// 약세장 → 강세장 전환
    Bull,
}

impl Regime {
    /// 이 국면의 가설 방향으로 `value`가 `reference`를 넘어섰는지 확인
    ///
    /// Bear는 아래로(`value < reference`), Bull은 위로(`value > reference`) 넘어선 경우입니다.
    pub fn is_beyond(&self, value: f64, reference: f64) -> bool {
        match self {
            Regime::Bear => value < reference,
            Regime::Bull => value > reference,
        }
    }

    /// 사람이 읽는 이름
    pub fn label(&self) -> &'static str {
        match self {
            Regime::Bear => "약세",
            Regime::Bull => "강세",
        }
    }
}

impl Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Regime::Bear => write!(f, "bear"),
            Regime::Bull => write!(f, "bull"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_is_beyond() {
        assert!(Regime::Bear.is_beyond(99.0, 100.0));
        assert!(!Regime::Bear.is_beyond(100.0, 100.0));
        assert!(Regime::Bull.is_beyond(101.0, 100.0));
        assert!(!Regime::Bull.is_beyond(100.0, 100.0));
    }

    #[test]
    fn test_chain_metrics_empty() {
        assert!(ChainMetrics::default().is_empty());
        assert!(!ChainMetrics::new(Some(1.0), None).is_empty());
    }

    #[test]
    fn test_candle_json_roundtrip_fields() {
        let json = r#"{"open_time":"2024-01-01T00:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":10.0}"#;
        let candle: OhlcvCandle = serde_json::from_str(json).unwrap();
        assert_eq!(candle.close_price(), 1.5);
        assert_eq!(candle.datetime().timestamp(), 1_704_067_200);
    }
}
