use common_test_utils::*;

use market_cycle_signal::analyzer::{
    ClassificationThresholds, Priority, RegimeScore, RuleContext, RuleResult, ScoringPolicy,
    SignalClassification, SignalStrengthAnalyzer, Tier, Verdict, aggregate, score_regime,
};
use market_cycle_signal::{CandleSeries, Regime, SignalEngine};

fn single_rule_score(regime: Regime, points: u32) -> RegimeScore {
    let result = RuleResult::from_verdict(
        "Test",
        Tier::PrimaryTrend,
        100,
        Verdict::scored(points, "테스트"),
    );
    RegimeScore::from_results(regime, vec![result])
}

fn breakdown_scores() -> (RegimeScore, RegimeScore) {
    let series = CandleSeries::annotated(create_breakdown_candles()).unwrap();
    let ctx = RuleContext::new(&series).unwrap();
    (
        score_regime(&ctx, Regime::Bear, None),
        score_regime(&ctx, Regime::Bull, None),
    )
}

#[test]
fn test_aggregate_matches_engine_decision() {
    let series = CandleSeries::annotated(create_breakdown_candles()).unwrap();
    let evaluation = SignalEngine::default().evaluate(&series, None).unwrap();

    let decision = aggregate(&evaluation.bear, &evaluation.bull);
    assert!(decision.atr.is_none());
    assert!(evaluation.decision.atr.is_some());
    assert_eq!(decision.with_atr(evaluation.decision.atr), evaluation.decision);
}

#[test]
fn test_lower_strong_threshold_escalates() {
    let (bear, bull) = breakdown_scores();
    let analyzer = SignalStrengthAnalyzer::new(
        ClassificationThresholds {
            strong: 75,
            confirmed: 60,
            watch: 40,
        },
        ScoringPolicy::Normalize,
    );

    let decision = analyzer.aggregate(&bear, &bull);
    assert_eq!(decision.classification, SignalClassification::Strong);
    assert_eq!(decision.priority, Priority::High);
    assert_eq!(decision.score, 76);
    assert!(decision.message.starts_with("강한 약세 신호"));
    assert!(decision.message.ends_with("(76/100)"));
}

#[test]
fn test_penalize_policy_demotes_to_watch() {
    let (bear, bull) = breakdown_scores();
    let analyzer =
        SignalStrengthAnalyzer::new(ClassificationThresholds::default(), ScoringPolicy::Penalize);

    let decision = analyzer.aggregate(&bear, &bull);
    assert_eq!(decision.classification, SignalClassification::Watch);
    assert_eq!(decision.score, 52);
    assert_eq!(decision.priority, Priority::Low);
    assert!(decision.message.is_empty());
    assert_eq!(decision.breakdown, bear.breakdown);
}

#[test]
fn test_tie_prefers_bear() {
    let decision = aggregate(
        &single_rule_score(Regime::Bear, 80),
        &single_rule_score(Regime::Bull, 80),
    );
    assert_eq!(decision.regime, Some(Regime::Bear));
    assert_eq!(decision.classification, SignalClassification::Confirmed);
}

#[test]
fn test_higher_score_wins() {
    let decision = aggregate(
        &single_rule_score(Regime::Bear, 55),
        &single_rule_score(Regime::Bull, 92),
    );
    assert_eq!(decision.regime, Some(Regime::Bull));
    assert_eq!(decision.classification, SignalClassification::Strong);
    assert!(decision.message.starts_with("강한 강세 신호"));
}

#[test]
fn test_neutral_reports_max_score() {
    let decision = aggregate(
        &single_rule_score(Regime::Bear, 31),
        &single_rule_score(Regime::Bull, 49),
    );
    assert_eq!(decision.classification, SignalClassification::None);
    assert_eq!(decision.regime, None);
    assert_eq!(decision.score, 49);
    assert_eq!(decision.priority, Priority::None);
    assert_eq!(decision.breakdown.len(), 1);
    assert_eq!(decision.breakdown[0].points_awarded, 49);
    assert!(!decision.is_dispatchable());
}
