// 시장 국면 규칙 분석기 모듈
// 지표가 계산된 시계열을 규칙 테이블로 평가하고 두 국면의 점수를 집계합니다.

pub mod base;
pub mod regime_analyzer;
pub mod rule;
pub mod rules;
pub mod signal_strength_analyzer;

pub use base::{MIN_CANDLES, RuleContext};
pub use regime_analyzer::{RegimeScore, ScoringPolicy, score_regime};
pub use rule::{RuleResult, RuleDefinition, RuleStatus, Tier, Verdict};
pub use rules::RULE_TABLE;
pub use signal_strength_analyzer::{
    AlertDecision, ClassificationThresholds, Priority, SignalClassification,
    SignalStrengthAnalyzer, aggregate,
};
