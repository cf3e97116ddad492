use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::analyzer::regime_analyzer::{DEFAULT_MIN_COVERAGE, RegimeScore, ScoringPolicy};
use crate::analyzer::rule::RuleResult;
use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::model::Regime;

/// 신호 강도 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalClassification {
    None,
    /// 관찰 대상 (알림 없음)
    Watch,
    /// 전환 확인
    Confirmed,
    /// 강한 전환 확인
    Strong,
}

impl SignalClassification {
    /// 알림 전송 대상인지 여부
    pub fn is_dispatchable(&self) -> bool {
        matches!(
            self,
            SignalClassification::Confirmed | SignalClassification::Strong
        )
    }

    /// 분류별 전송 우선순위
    pub fn priority(&self) -> Priority {
        match self {
            SignalClassification::Strong => Priority::High,
            SignalClassification::Confirmed => Priority::Medium,
            SignalClassification::Watch => Priority::Low,
            SignalClassification::None => Priority::None,
        }
    }
}

impl Display for SignalClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalClassification::None => write!(f, "None"),
            SignalClassification::Watch => write!(f, "Watch"),
            SignalClassification::Confirmed => write!(f, "Confirmed"),
            SignalClassification::Strong => write!(f, "Strong"),
        }
    }
}

/// 알림 우선순위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    None,
    Low,
    Medium,
    High,
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::None => write!(f, "none"),
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// 분류 기준 점수 (두 국면 공통)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub strong: u32,
    pub confirmed: u32,
    pub watch: u32,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        ClassificationThresholds {
            strong: 90,
            confirmed: 70,
            watch: 50,
        }
    }
}

impl ClassificationThresholds {
    /// 점수를 분류로 변환
    pub fn classify(&self, score: u32) -> SignalClassification {
        if score >= self.strong {
            SignalClassification::Strong
        } else if score >= self.confirmed {
            SignalClassification::Confirmed
        } else if score >= self.watch {
            SignalClassification::Watch
        } else {
            SignalClassification::None
        }
    }
}

impl ConfigValidation for ClassificationThresholds {
    fn validate(&self) -> ConfigResult<()> {
        if self.strong > 100 {
            return Err(ConfigError::ValidationError(
                "strong 기준은 100 이하여야 합니다".to_string(),
            ));
        }

        if !(self.strong > self.confirmed && self.confirmed > self.watch) {
            return Err(ConfigError::ValidationError(format!(
                "분류 기준은 strong > confirmed > watch 순이어야 합니다: {} / {} / {}",
                self.strong, self.confirmed, self.watch
            )));
        }

        if self.watch == 0 {
            return Err(ConfigError::ValidationError(
                "watch 기준은 0보다 커야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

/// 평가 1회의 알림 결정
///
/// `message`는 `Confirmed`/`Strong`일 때만 비어 있지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub classification: SignalClassification,
    /// 우세 국면 (`None` 분류이면 없음)
    pub regime: Option<Regime>,
    /// 우세 국면의 유효 점수 (`None` 분류이면 두 점수 중 큰 값)
    pub score: u32,
    pub message: String,
    pub priority: Priority,
    /// 우세 국면의 규칙별 결과 (`None` 분류이면 `score`를 낸 국면, 동점이면 약세)
    pub breakdown: Vec<RuleResult>,
    /// 최신 ATR(14)
    pub atr: Option<f64>,
}

impl AlertDecision {
    /// 알림 전송 대상인지 여부
    pub fn is_dispatchable(&self) -> bool {
        self.classification.is_dispatchable()
    }

    /// 변동성 값을 붙인 결정 반환
    pub fn with_atr(mut self, atr: Option<f64>) -> Self {
        self.atr = atr;
        self
    }
}

/// 분류·국면별 알림 제목
pub fn headline(classification: SignalClassification, regime: Option<Regime>) -> &'static str {
    match (classification, regime) {
        (SignalClassification::Strong, Some(Regime::Bear)) => "강한 약세 신호 - 강세장에서 약세장 전환 고도 확인",
        (SignalClassification::Strong, Some(Regime::Bull)) => "강한 강세 신호 - 약세장에서 강세장 전환 고도 확인",
        (SignalClassification::Confirmed, Some(Regime::Bear)) => "약세 신호 - 강세장에서 약세장 전환 확인",
        (SignalClassification::Confirmed, Some(Regime::Bull)) => "강세 신호 - 약세장에서 강세장 전환 확인",
        (SignalClassification::Watch, Some(Regime::Bear)) => "약세 주의 신호",
        (SignalClassification::Watch, Some(Regime::Bull)) => "강세 주의 신호",
        _ => "중립 - 계속 관찰",
    }
}

/// 두 국면 점수를 분류하고 우세한 알림을 선택하는 집계기
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStrengthAnalyzer {
    pub thresholds: ClassificationThresholds,
    pub policy: ScoringPolicy,
    /// 정규화에 필요한 최소 평가 가능 점수
    pub min_coverage: u32,
}

impl Default for SignalStrengthAnalyzer {
    fn default() -> Self {
        Self::new(ClassificationThresholds::default(), ScoringPolicy::default())
    }
}

impl SignalStrengthAnalyzer {
    pub fn new(thresholds: ClassificationThresholds, policy: ScoringPolicy) -> Self {
        SignalStrengthAnalyzer {
            thresholds,
            policy,
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }

    /// 최소 평가 가능 점수 설정
    pub fn with_min_coverage(mut self, min_coverage: u32) -> Self {
        self.min_coverage = min_coverage;
        self
    }

    /// 설정된 정책과 최소 평가 범위로 계산한 유효 점수
    pub fn effective_score(&self, score: &RegimeScore) -> u32 {
        score.effective_score_with(self.policy, self.min_coverage)
    }

    /// 약세/강세 점수를 하나의 알림 결정으로 집계
    ///
    /// 두 국면이 모두 관찰 기준 이상이면 점수가 높은 쪽이 이기고, 동점이면 약세가 이깁니다.
    pub fn aggregate(&self, bear: &RegimeScore, bull: &RegimeScore) -> AlertDecision {
        let bear_score = self.effective_score(bear);
        let bull_score = self.effective_score(bull);
        let bear_class = self.thresholds.classify(bear_score);
        let bull_class = self.thresholds.classify(bull_score);

        log::debug!(
            "집계: 약세 {} ({}), 강세 {} ({})",
            bear_score,
            bear_class,
            bull_score,
            bull_class
        );

        let winner = match (
            bear_class != SignalClassification::None,
            bull_class != SignalClassification::None,
        ) {
            (true, true) if bull_score > bear_score => Some((bull, bull_score, bull_class)),
            (true, _) => Some((bear, bear_score, bear_class)),
            (false, true) => Some((bull, bull_score, bull_class)),
            (false, false) => None,
        };

        let Some((score, value, classification)) = winner else {
            let (reported, value) = if bull_score > bear_score {
                (bull, bull_score)
            } else {
                (bear, bear_score)
            };
            return AlertDecision {
                classification: SignalClassification::None,
                regime: None,
                score: value,
                message: String::new(),
                priority: Priority::None,
                breakdown: reported.breakdown.clone(),
                atr: None,
            };
        };

        let message = if classification.is_dispatchable() {
            format!(
                "{} ({}/100)",
                headline(classification, Some(score.regime)),
                value
            )
        } else {
            String::new()
        };

        AlertDecision {
            classification,
            regime: Some(score.regime),
            score: value,
            message,
            priority: classification.priority(),
            breakdown: score.breakdown.clone(),
            atr: None,
        }
    }
}

/// 기본 기준과 정책으로 두 국면 점수를 집계합니다.
pub fn aggregate(bear: &RegimeScore, bull: &RegimeScore) -> AlertDecision {
    SignalStrengthAnalyzer::default().aggregate(bear, bull)
}
