use common_test_utils::*;

use market_cycle_signal::analyzer::{
    Priority, RULE_TABLE, RuleStatus, ScoringPolicy, SignalClassification,
};
use market_cycle_signal::engine::{EngineConfig, SignalEngine};
use market_cycle_signal::indicator::IndicatorKey;
use market_cycle_signal::{CandleSeries, ChainMetrics, Regime, SignalError, evaluate};

fn engine() -> SignalEngine {
    SignalEngine::default()
}

#[test]
fn test_flat_series_has_no_decision() {
    let series = CandleSeries::annotated(create_flat_candles(25)).unwrap();
    let evaluation = engine().evaluate(&series, None).unwrap();

    assert_eq!(series.value(&IndicatorKey::Rsi(14), 24), Some(50.0));
    assert!(evaluation.bear.effective_score(ScoringPolicy::Normalize) < 50);
    assert!(evaluation.bull.effective_score(ScoringPolicy::Normalize) < 50);
    assert_eq!(
        evaluation.bear.rule("Lower_Low").unwrap().points_awarded,
        0
    );
    assert_eq!(
        evaluation.bull.rule("Higher_High").unwrap().points_awarded,
        0
    );
    assert_eq!(evaluation.decision.classification, SignalClassification::None);
    assert_eq!(evaluation.decision.regime, None);
    assert!(evaluation.decision.message.is_empty());
    assert_eq!(evaluation.decision.breakdown.len(), 13);
}

#[test]
fn test_three_falling_candles_do_not_alert() {
    let candles = vec![
        TestCandle::weekly(0, 100.0, 101.0, 99.0, 100.0, 10.0),
        TestCandle::weekly(1, 100.0, 100.5, 97.0, 98.0, 10.0),
        TestCandle::weekly(2, 98.0, 98.5, 95.0, 96.0, 10.0),
    ];
    let series = CandleSeries::new(candles).unwrap();
    let decision = evaluate(&series, None).unwrap();

    assert_eq!(decision.classification, SignalClassification::None);
    assert_eq!(decision.priority, Priority::None);
    assert_eq!(decision.score, 15);
    assert!(decision.message.is_empty());

    // 판단 근거는 그대로 남음
    assert_eq!(decision.breakdown.len(), 13);
    let evaluable: Vec<&str> = decision
        .breakdown
        .iter()
        .filter(|r| r.points_awarded > 0)
        .map(|r| r.rule_id)
        .collect();
    assert_eq!(evaluable, vec!["Lower_Low", "OBV"]);
}

#[test]
fn test_breakdown_series_confirms_bear() {
    let series = CandleSeries::annotated(create_breakdown_candles()).unwrap();
    let evaluation = engine().evaluate(&series, None).unwrap();
    let decision = &evaluation.decision;

    assert!(decision.score >= 70);
    assert!(decision.classification >= SignalClassification::Confirmed);
    assert_eq!(decision.regime, Some(Regime::Bear));
    assert_eq!(decision.priority, Priority::Medium);
    assert!(!decision.message.is_empty());
    assert_eq!(decision.breakdown, evaluation.bear.breakdown);

    let ema = evaluation.bear.rule("EMA_20").unwrap();
    assert_eq!(ema.points_awarded, 20);
    assert_eq!(ema.status, RuleStatus::Met);
}

#[test]
fn test_chain_metrics_never_lower_bear_score() {
    let series = CandleSeries::annotated(create_breakdown_candles()).unwrap();
    let without = engine().evaluate(&series, None).unwrap();
    let metrics = ChainMetrics::new(Some(6.0), None);
    let with = engine().evaluate(&series, Some(&metrics)).unwrap();

    for policy in [ScoringPolicy::Normalize, ScoringPolicy::Penalize] {
        assert!(with.bear.effective_score(policy) >= without.bear.effective_score(policy));
    }
    assert_eq!(with.bear.rule("MVRV").unwrap().points_awarded, 3);
    assert_eq!(with.bear.rule("SOPR").unwrap().status, RuleStatus::Unavailable);
    assert_eq!(without.bear.rule("MVRV").unwrap().status, RuleStatus::Unavailable);
}

#[test]
fn test_minimum_length_boundary() {
    let two = CandleSeries::new(create_flat_candles(2)).unwrap();
    assert!(matches!(
        evaluate(&two, None),
        Err(SignalError::InsufficientData { required: 3, actual: 2 })
    ));

    let three = CandleSeries::new(create_flat_candles(3)).unwrap();
    let evaluation = engine().evaluate(&three, None).unwrap();
    assert_eq!(evaluation.bear.breakdown.len(), RULE_TABLE.len());
    assert_eq!(evaluation.bull.breakdown.len(), RULE_TABLE.len());
}

#[test]
fn test_score_invariants_hold_for_many_series() {
    let inputs = vec![
        create_flat_candles(3),
        create_flat_candles(40),
        create_uptrend_candles(60, 100.0, 2.0),
        create_downtrend_candles(60, 300.0, 2.0),
        create_wave_candles(30),
        create_wave_candles(250),
        create_breakdown_candles(),
    ];
    let metrics = ChainMetrics::new(Some(1.2), Some(1.01));

    for candles in inputs {
        let series = CandleSeries::annotated(candles).unwrap();
        for chain in [None, Some(&metrics)] {
            let evaluation = engine().evaluate(&series, chain).unwrap();
            for score in [&evaluation.bear, &evaluation.bull] {
                let awarded: u32 = score.breakdown.iter().map(|r| r.points_awarded).sum();
                assert_eq!(score.max_total(), 100);
                assert_eq!(score.total, awarded);
                assert!(score.total <= 100);
                assert!(score.available_max <= 100);
                assert!(score.total <= score.available_max);
                for result in &score.breakdown {
                    assert!(result.points_awarded <= result.max_points);
                }
            }
        }
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let series = CandleSeries::annotated(create_wave_candles(120)).unwrap();
    let metrics = ChainMetrics::new(Some(3.0), Some(0.99));

    let first = engine().evaluate(&series, Some(&metrics)).unwrap();
    let second = engine().evaluate(&series, Some(&metrics)).unwrap();

    assert_eq!(first, second);
    assert_eq!(format!("{:?}", first.decision), format!("{:?}", second.decision));
}

#[test]
fn test_raising_close_below_ema_keeps_ema20_points() {
    let base = create_breakdown_candles();
    let mut previous = 0;

    for bump in [0.0, 1.0, 2.0, 3.0] {
        let mut candles = base.clone();
        let last = candles.len() - 1;
        candles[last].close += bump;
        candles[last].high = candles[last].high.max(candles[last].close);

        let series = CandleSeries::annotated(candles).unwrap();
        let latest_close = series.candles()[last].close;
        let ema = series.value(&IndicatorKey::Ema(20), last).unwrap();
        assert!(latest_close < ema);

        let evaluation = engine().evaluate(&series, None).unwrap();
        let points = evaluation.bear.rule("EMA_20").unwrap().points_awarded;
        assert!(points >= previous);
        previous = points;
    }
}

#[test]
fn test_steady_uptrend_watches_bull() {
    let series = CandleSeries::annotated(create_uptrend_candles(220, 100.0, 2.0)).unwrap();
    let evaluation = engine().evaluate(&series, None).unwrap();

    assert_eq!(evaluation.bull.rule("EMA_20").unwrap().points_awarded, 20);
    assert_eq!(evaluation.bull.rule("EMA_50").unwrap().points_awarded, 10);
    assert_eq!(evaluation.bull.rule("Golden_Cross").unwrap().points_awarded, 10);
    assert_eq!(evaluation.bull.rule("Higher_High").unwrap().points_awarded, 10);
    assert_eq!(evaluation.bull.rule("OBV").unwrap().points_awarded, 5);
    assert_eq!(evaluation.bull.rule("RSI").unwrap().points_awarded, 4);
    assert!(evaluation.bear.effective_score(ScoringPolicy::Normalize) < 50);

    // 거래량 평균 돌파가 없어 관찰 단계에 머무름
    assert_eq!(evaluation.decision.regime, Some(Regime::Bull));
    assert_eq!(evaluation.decision.classification, SignalClassification::Watch);
    assert_eq!(evaluation.decision.priority, Priority::Low);
}

#[test]
fn test_penalize_policy_from_config() {
    let engine = SignalEngine::new(EngineConfig {
        scoring_policy: ScoringPolicy::Penalize,
        ..EngineConfig::default()
    });
    let series = CandleSeries::annotated(create_breakdown_candles()).unwrap();
    let decision = engine.evaluate(&series, None).unwrap().decision;

    assert_eq!(decision.classification, SignalClassification::Watch);
    assert_eq!(decision.regime, Some(Regime::Bear));
    assert!(decision.message.is_empty());
}

#[test]
fn test_invalid_candles_are_rejected() {
    let mut candles = create_flat_candles(5);
    candles[3].timestamp = candles[1].timestamp;
    assert!(matches!(
        CandleSeries::new(candles),
        Err(SignalError::InvalidInput(_))
    ));

    let mut candles = create_flat_candles(5);
    candles[2].low = -1.0;
    assert!(CandleSeries::annotated(candles).is_err());
}
