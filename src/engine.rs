use serde::{Deserialize, Serialize};

use crate::analyzer::base::RuleContext;
use crate::analyzer::regime_analyzer::{
    DEFAULT_MIN_COVERAGE, RegimeScore, ScoringPolicy, score_regime,
};
use crate::analyzer::signal_strength_analyzer::{
    AlertDecision, ClassificationThresholds, SignalStrengthAnalyzer,
};
use crate::candle_series::CandleSeries;
use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::error::SignalResult;
use crate::indicator::{self, IndicatorKey};
use crate::model::{Candle, ChainMetrics, Regime};

/// 신호 엔진 설정
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring_policy: ScoringPolicy,
    /// 정규화에 필요한 최소 평가 가능 점수 (미달이면 원점수 사용)
    pub min_coverage: u32,
    pub thresholds: ClassificationThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            scoring_policy: ScoringPolicy::default(),
            min_coverage: DEFAULT_MIN_COVERAGE,
            thresholds: ClassificationThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// 설정으로 집계기 생성
    pub fn analyzer(&self) -> SignalStrengthAnalyzer {
        SignalStrengthAnalyzer::new(self.thresholds, self.scoring_policy)
            .with_min_coverage(self.min_coverage)
    }
}

impl ConfigValidation for EngineConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.min_coverage > 100 {
            return Err(ConfigError::ValidationError(format!(
                "min_coverage는 100 이하여야 합니다: {}",
                self.min_coverage
            )));
        }

        self.thresholds.validate()
    }
}

/// 평가 1회의 전체 결과
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub bear: RegimeScore,
    pub bull: RegimeScore,
    pub decision: AlertDecision,
}

impl Evaluation {
    /// 국면별 점수 조회
    pub fn score(&self, regime: Regime) -> &RegimeScore {
        match regime {
            Regime::Bear => &self.bear,
            Regime::Bull => &self.bull,
        }
    }
}

/// 시장 사이클 신호 엔진
///
/// 상태를 갖지 않으므로 여러 스레드에서 동시에 사용할 수 있습니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEngine {
    config: EngineConfig,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        SignalEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 시계열을 평가하여 두 국면 점수와 알림 결정을 만듭니다.
    ///
    /// 지표가 아직 계산되지 않은 시계열은 복사본에 지표를 계산해 사용합니다.
    ///
    /// # Returns
    /// * `SignalResult<Evaluation>` - 캔들이 3개 미만이면 `InsufficientData`
    pub fn evaluate<C: Candle + 'static>(
        &self,
        series: &CandleSeries<C>,
        chain: Option<&ChainMetrics>,
    ) -> SignalResult<Evaluation> {
        if series.is_annotated() {
            self.evaluate_annotated(series, chain)
        } else {
            let annotated = indicator::annotate(series.clone());
            self.evaluate_annotated(&annotated, chain)
        }
    }

    fn evaluate_annotated<C: Candle>(
        &self,
        series: &CandleSeries<C>,
        chain: Option<&ChainMetrics>,
    ) -> SignalResult<Evaluation> {
        let context = RuleContext::new(series)?;

        let bear = score_regime(&context, Regime::Bear, chain);
        let bull = score_regime(&context, Regime::Bull, chain);

        let analyzer = self.config.analyzer();
        let atr = context.indicator(IndicatorKey::Atr(14), context.latest());
        let decision = analyzer.aggregate(&bear, &bull).with_atr(atr);

        log::info!(
            "평가 완료: 약세 {}/100, 강세 {}/100 → {} {}",
            analyzer.effective_score(&bear),
            analyzer.effective_score(&bull),
            decision.classification,
            decision.regime.map(|r| r.label()).unwrap_or("-")
        );

        Ok(Evaluation {
            bear,
            bull,
            decision,
        })
    }
}

/// 기본 설정으로 시계열을 평가하여 알림 결정을 반환합니다.
pub fn evaluate<C: Candle + 'static>(
    series: &CandleSeries<C>,
    chain: Option<&ChainMetrics>,
) -> SignalResult<AlertDecision> {
    SignalEngine::default()
        .evaluate(series, chain)
        .map(|evaluation| evaluation.decision)
}
