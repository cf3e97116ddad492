use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::analyzer::base::RuleContext;
use crate::analyzer::rule::RuleResult;
use crate::analyzer::rules::RULE_TABLE;
use crate::model::{ChainMetrics, Regime};

/// 데이터가 부족한 규칙의 점수 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// 평가 불가 규칙도 0점으로 합산 (유효 점수 = 원점수)
    Penalize,
    /// 평가 가능한 규칙의 최대 점수 합으로 정규화
    #[default]
    Normalize,
}

impl Display for ScoringPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringPolicy::Penalize => write!(f, "penalize"),
            ScoringPolicy::Normalize => write!(f, "normalize"),
        }
    }
}

/// 정규화에 필요한 기본 최소 평가 가능 점수
///
/// 주 추세 규칙이 모두 룩백 부족인 짧은 시계열은 보통 이 기준에 못 미칩니다.
pub const DEFAULT_MIN_COVERAGE: u32 = 50;

/// 국면별 점수
///
/// `total`은 항상 `breakdown`의 획득 점수 합이고,
/// `breakdown`은 규칙 테이블 선언 순서를 따릅니다.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeScore {
    pub regime: Regime,
    /// 획득 점수 합
    pub total: u32,
    /// 평가 가능했던 규칙의 최대 점수 합
    pub available_max: u32,
    pub breakdown: Vec<RuleResult>,
}

impl RegimeScore {
    /// 규칙 결과로부터 점수 생성
    pub fn from_results(regime: Regime, breakdown: Vec<RuleResult>) -> Self {
        let total = breakdown.iter().map(|r| r.points_awarded).sum();
        let available_max = breakdown
            .iter()
            .filter(|r| r.is_evaluable())
            .map(|r| r.max_points)
            .sum();

        RegimeScore {
            regime,
            total,
            available_max,
            breakdown,
        }
    }

    /// 모든 규칙의 최대 점수 합 (완전한 규칙 세트는 100)
    pub fn max_total(&self) -> u32 {
        self.breakdown.iter().map(|r| r.max_points).sum()
    }

    /// 기본 최소 평가 범위를 적용한 0~100 유효 점수
    pub fn effective_score(&self, policy: ScoringPolicy) -> u32 {
        self.effective_score_with(policy, DEFAULT_MIN_COVERAGE)
    }

    /// 정책에 따른 0~100 유효 점수
    ///
    /// `Normalize`라도 `available_max`가 `min_coverage`보다 작으면 정규화하지 않고
    /// 원점수를 그대로 씁니다.
    pub fn effective_score_with(&self, policy: ScoringPolicy, min_coverage: u32) -> u32 {
        match policy {
            ScoringPolicy::Penalize => self.total,
            ScoringPolicy::Normalize if self.available_max < min_coverage => self.total,
            ScoringPolicy::Normalize => {
                if self.available_max == 0 {
                    return 0;
                }
                let scaled = self.total as f64 * 100.0 / self.available_max as f64;
                (scaled.round() as u32).min(100)
            }
        }
    }

    /// 정규화 기준을 채웠는지 여부
    pub fn has_coverage(&self, min_coverage: u32) -> bool {
        self.available_max >= min_coverage
    }

    /// 규칙 ID로 결과 조회
    pub fn rule(&self, rule_id: &str) -> Option<&RuleResult> {
        self.breakdown.iter().find(|r| r.rule_id == rule_id)
    }
}

/// 국면 하나에 대해 규칙 테이블 전체를 평가합니다.
///
/// 모든 규칙은 단락 없이 평가되므로 결과에는 항상 테이블의 모든 규칙이 들어 있습니다.
pub fn score_regime(
    context: &RuleContext<'_>,
    regime: Regime,
    chain: Option<&ChainMetrics>,
) -> RegimeScore {
    let breakdown: Vec<RuleResult> = RULE_TABLE
        .iter()
        .map(|rule| rule.apply(context, regime, chain))
        .collect();

    for result in &breakdown {
        log::trace!("[{}] {}", regime, result);
    }

    let score = RegimeScore::from_results(regime, breakdown);
    log::debug!(
        "{} 점수: {}/{} (평가 가능 {})",
        regime.label(),
        score.total,
        score.max_total(),
        score.available_max
    );
    score
}
