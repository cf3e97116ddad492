use serde::Serialize;
use std::fmt::Display;

use crate::analyzer::base::RuleContext;
use crate::model::{ChainMetrics, Regime};

/// 규칙 평가 상태
///
/// 조건 불충족(`Failed`)과 데이터 부족(`InsufficientLookback`, `Unavailable`)을 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// 만점
    Met,
    /// 부분 점수
    Partial,
    /// 조건 불충족
    Failed,
    /// 지표 룩백 부족
    InsufficientLookback,
    /// 외부 데이터 없음
    Unavailable,
}

impl RuleStatus {
    /// 판정 문자열 앞에 붙는 표시
    pub fn marker(&self) -> &'static str {
        match self {
            RuleStatus::Met => "✅",
            RuleStatus::Partial => "🟡",
            RuleStatus::Failed => "❌",
            RuleStatus::InsufficientLookback => "⏳",
            RuleStatus::Unavailable => "ℹ️",
        }
    }

    /// 점수 계산 대상인지 여부
    pub fn is_evaluable(&self) -> bool {
        !matches!(
            self,
            RuleStatus::InsufficientLookback | RuleStatus::Unavailable
        )
    }
}

/// 확인 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// 주 추세 확인 (40점)
    PrimaryTrend,
    /// 가격 행동 확인 (25점)
    PriceAction,
    /// 모멘텀 확인 (20점)
    Momentum,
    /// 거래량 확인 (10점)
    Volume,
    /// 온체인 확인 (5점)
    ChainData,
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::PrimaryTrend => write!(f, "주 추세"),
            Tier::PriceAction => write!(f, "가격 행동"),
            Tier::Momentum => write!(f, "모멘텀"),
            Tier::Volume => write!(f, "거래량"),
            Tier::ChainData => write!(f, "온체인"),
        }
    }
}

/// 규칙 하나의 평가 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// 평가됨 (0점 포함)
    Scored { points: u32, reason: String },
    /// 지표 룩백 부족
    InsufficientLookback(String),
    /// 외부 데이터 없음
    Unavailable(String),
}

impl Verdict {
    pub fn scored(points: u32, reason: impl Into<String>) -> Self {
        Verdict::Scored {
            points,
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Verdict::scored(0, reason)
    }

    pub fn insufficient(reason: impl Into<String>) -> Self {
        Verdict::InsufficientLookback(reason.into())
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Verdict::Unavailable(reason.into())
    }
}

/// 규칙 평가 함수
pub type RuleFn = fn(&RuleContext<'_>, Regime, Option<&ChainMetrics>) -> Verdict;

/// 규칙 테이블 항목
///
/// 하나의 항목이 약세/강세 양쪽 규칙을 정의하며, 평가 함수는 국면을 극성으로 받습니다.
#[derive(Debug, Clone, Copy)]
pub struct RuleDefinition {
    /// 약세 규칙 ID
    pub bear_id: &'static str,
    /// 강세 규칙 ID
    pub bull_id: &'static str,
    pub tier: Tier,
    pub max_points: u32,
    pub evaluate: RuleFn,
}

impl RuleDefinition {
    /// 국면별 규칙 ID
    pub fn id(&self, regime: Regime) -> &'static str {
        match regime {
            Regime::Bear => self.bear_id,
            Regime::Bull => self.bull_id,
        }
    }

    /// 규칙을 평가하여 결과 생성
    pub fn apply(
        &self,
        context: &RuleContext<'_>,
        regime: Regime,
        chain: Option<&ChainMetrics>,
    ) -> RuleResult {
        let verdict = (self.evaluate)(context, regime, chain);
        RuleResult::from_verdict(self.id(regime), self.tier, self.max_points, verdict)
    }
}

/// 규칙 평가 결과
///
/// `points_awarded`는 항상 `0..=max_points` 범위입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    pub rule_id: &'static str,
    pub points_awarded: u32,
    pub max_points: u32,
    pub status: RuleStatus,
    pub tier: Tier,
    /// 사람이 읽는 판정 문자열 (예: "✅ [20점] 2봉 연속 EMA20 아래")
    pub verdict: String,
}

impl RuleResult {
    /// 평가 함수의 판정을 결과로 변환
    pub fn from_verdict(rule_id: &'static str, tier: Tier, max_points: u32, verdict: Verdict) -> Self {
        let (points, status, reason) = match verdict {
            Verdict::Scored { points, reason } => {
                let points = points.min(max_points);
                let status = if points == max_points {
                    RuleStatus::Met
                } else if points > 0 {
                    RuleStatus::Partial
                } else {
                    RuleStatus::Failed
                };
                (points, status, reason)
            }
            Verdict::InsufficientLookback(reason) => (0, RuleStatus::InsufficientLookback, reason),
            Verdict::Unavailable(reason) => (0, RuleStatus::Unavailable, reason),
        };

        RuleResult {
            rule_id,
            points_awarded: points,
            max_points,
            status,
            tier,
            verdict: format!("{} [{}점] {}", status.marker(), points, reason),
        }
    }

    /// 점수 계산 대상인지 여부
    pub fn is_evaluable(&self) -> bool {
        self.status.is_evaluable()
    }
}

impl Display for RuleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.rule_id, self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_points() {
        let met = RuleResult::from_verdict("EMA_20", Tier::PrimaryTrend, 20, Verdict::scored(20, "a"));
        let partial =
            RuleResult::from_verdict("EMA_20", Tier::PrimaryTrend, 20, Verdict::scored(10, "b"));
        let failed = RuleResult::from_verdict("EMA_20", Tier::PrimaryTrend, 20, Verdict::failed("c"));

        assert_eq!(met.status, RuleStatus::Met);
        assert_eq!(partial.status, RuleStatus::Partial);
        assert_eq!(failed.status, RuleStatus::Failed);
        assert_eq!(met.verdict, "✅ [20점] a");
        assert_eq!(partial.verdict, "🟡 [10점] b");
        assert_eq!(failed.verdict, "❌ [0점] c");
    }

    #[test]
    fn test_points_are_capped() {
        let result = RuleResult::from_verdict("OBV", Tier::Volume, 5, Verdict::scored(9, "x"));
        assert_eq!(result.points_awarded, 5);
    }

    #[test]
    fn test_absent_data_is_not_failure() {
        let lookback =
            RuleResult::from_verdict("MACD", Tier::Momentum, 7, Verdict::insufficient("룩백 부족"));
        let unavailable =
            RuleResult::from_verdict("MVRV", Tier::ChainData, 3, Verdict::unavailable("데이터 없음"));

        assert_eq!(lookback.points_awarded, 0);
        assert_eq!(lookback.status, RuleStatus::InsufficientLookback);
        assert!(!lookback.is_evaluable());
        assert_eq!(lookback.verdict, "⏳ [0점] 룩백 부족");
        assert_eq!(unavailable.status, RuleStatus::Unavailable);
        assert_eq!(unavailable.to_string(), "MVRV → ℹ️ [0점] 데이터 없음");
    }

    #[test]
    fn test_result_serializes_for_audit() {
        let result =
            RuleResult::from_verdict("MACD", Tier::Momentum, 7, Verdict::insufficient("룩백 부족"));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["rule_id"], "MACD");
        assert_eq!(json["points_awarded"], 0);
        assert_eq!(json["status"], "insufficient_lookback");
        assert_eq!(json["tier"], "momentum");
        assert_eq!(json["verdict"], "⏳ [0점] 룩백 부족");
    }
}
