use serde::{Deserialize, Serialize};

use crate::alert::dispatch::Dispatcher;
use crate::alert::formatter;
use crate::analyzer::regime_analyzer::RegimeScore;
use crate::analyzer::signal_strength_analyzer::SignalClassification;
use crate::candle_series::CandleSeries;
use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::engine::{EngineConfig, Evaluation, SignalEngine};
use crate::error::SignalError;
use crate::model::{Candle, ChainMetrics};

/// 모니터 점검 오류
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorError {
    /// 캔들 조회 실패
    Fetch(String),
    /// 신호 평가 실패
    Signal(SignalError),
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::Fetch(msg) => write!(f, "캔들 조회 실패: {}", msg),
            MonitorError::Signal(err) => write!(f, "신호 평가 실패: {}", err),
        }
    }
}

impl std::error::Error for MonitorError {}

impl From<SignalError> for MonitorError {
    fn from(err: SignalError) -> Self {
        MonitorError::Signal(err)
    }
}

/// 캔들 조회 인터페이스
///
/// 시간 오름차순 캔들을 반환해야 합니다.
pub trait CandleSource<C: Candle> {
    fn fetch_candles(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<C>, String>;
}

/// 온체인 지표 조회 인터페이스
///
/// 데이터가 없으면 오류가 아니라 `Ok(None)`을 반환합니다.
pub trait ChainMetricsSource {
    fn fetch_chain_metrics(&self, asset: &str) -> Result<Option<ChainMetrics>, String>;
}

/// 온체인 데이터를 쓰지 않을 때의 조회기
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChainMetrics;

impl ChainMetricsSource for NoChainMetrics {
    fn fetch_chain_metrics(&self, _asset: &str) -> Result<Option<ChainMetrics>, String> {
        Ok(None)
    }
}

/// 모니터 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub symbol: String,
    pub timeframe: String,
    pub limit: usize,
    pub asset: String,
    /// 평가를 시작하기 위한 최소 캔들 수
    pub min_candles: usize,
    pub use_chain_metrics: bool,
    pub engine: EngineConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            symbol: "BTC/USDT".to_string(),
            timeframe: "1w".to_string(),
            limit: 200,
            asset: "BTC".to_string(),
            min_candles: 50,
            use_chain_metrics: true,
            engine: EngineConfig::default(),
        }
    }
}

impl ConfigValidation for MonitorConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "symbol은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.timeframe.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "timeframe은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.min_candles < 3 {
            return Err(ConfigError::ValidationError(
                "min_candles는 3 이상이어야 합니다".to_string(),
            ));
        }

        if self.limit < self.min_candles {
            return Err(ConfigError::ValidationError(format!(
                "limit({})는 min_candles({}) 이상이어야 합니다",
                self.limit, self.min_candles
            )));
        }

        self.engine.validate()
    }
}

/// 점검 1회의 결과
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// 캔들 수가 최소 기준에 못 미쳐 평가를 건너뜀
    Skipped { candles: usize },
    /// 평가 완료
    Evaluated {
        evaluation: Evaluation,
        /// 전송한 메시지 (전송 대상이 아니면 `None`)
        message: Option<String>,
    },
}

/// 시장 신호 모니터
///
/// 외부 조회기와 전송기를 묶어 한 번의 점검을 수행합니다. 스케줄링은 호출자의 몫입니다.
pub struct MarketSignalMonitor<S, M, D> {
    config: MonitorConfig,
    engine: SignalEngine,
    candles: S,
    chain: M,
    dispatcher: D,
}

impl<S, M, D> MarketSignalMonitor<S, M, D>
where
    M: ChainMetricsSource,
    D: Dispatcher,
{
    pub fn new(config: MonitorConfig, candles: S, chain: M, dispatcher: D) -> Self {
        MarketSignalMonitor {
            engine: SignalEngine::new(config.engine),
            config,
            candles,
            chain,
            dispatcher,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// 점검 1회 수행
    pub fn check<C>(&self) -> Result<CheckOutcome, MonitorError>
    where
        C: Candle + 'static,
        S: CandleSource<C>,
    {
        log::info!(
            "시장 신호 점검 시작: {} {} (limit {})",
            self.config.symbol,
            self.config.timeframe,
            self.config.limit
        );

        let candles = self
            .candles
            .fetch_candles(&self.config.symbol, &self.config.timeframe, self.config.limit)
            .map_err(|e| {
                log::error!("캔들 조회 실패: {}", e);
                MonitorError::Fetch(e)
            })?;

        if candles.len() < self.config.min_candles {
            log::warn!(
                "캔들 부족으로 점검 생략: {}개 < {}개",
                candles.len(),
                self.config.min_candles
            );
            return Ok(CheckOutcome::Skipped {
                candles: candles.len(),
            });
        }

        let chain = self.fetch_chain_metrics();
        let series = CandleSeries::annotated(candles)?;
        let evaluation = self.engine.evaluate(&series, chain.as_ref())?;

        log_breakdown(&evaluation.bear);
        log_breakdown(&evaluation.bull);

        let decision = &evaluation.decision;
        let message = match (decision.classification, series.latest()) {
            (classification, Some(latest)) if classification.is_dispatchable() => {
                let message = formatter::format(decision, latest);
                if let Err(e) = self.dispatcher.dispatch(&message, decision.priority) {
                    log::error!("{}", e);
                }
                Some(message)
            }
            (SignalClassification::Watch, _) => {
                log::info!(
                    "{} 주의 신호 ({}점), 관찰 유지",
                    decision.regime.map(|r| r.label()).unwrap_or("-"),
                    decision.score
                );
                None
            }
            _ => {
                log::info!("시장 중립, 계속 관찰");
                None
            }
        };

        Ok(CheckOutcome::Evaluated {
            evaluation,
            message,
        })
    }

    fn fetch_chain_metrics(&self) -> Option<ChainMetrics> {
        if !self.config.use_chain_metrics {
            return None;
        }

        match self.chain.fetch_chain_metrics(&self.config.asset) {
            Ok(Some(metrics)) => {
                log::info!(
                    "온체인 데이터: MVRV={:?}, SOPR={:?}",
                    metrics.mvrv_z_score,
                    metrics.sopr
                );
                Some(metrics)
            }
            Ok(None) => {
                log::info!("온체인 데이터 없음");
                None
            }
            Err(e) => {
                log::warn!("온체인 데이터 조회 실패, 제외하고 평가: {}", e);
                None
            }
        }
    }
}

fn log_breakdown(score: &RegimeScore) {
    log::info!(
        "{} 신호 상세 ({}/{}):",
        score.regime.label(),
        score.total,
        score.max_total()
    );
    for result in &score.breakdown {
        log::info!("  {}", result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_candles, 50);
        assert_eq!(config.timeframe, "1w");
    }

    #[test]
    fn test_invalid_config() {
        let config = MonitorConfig {
            limit: 10,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err: MonitorError = SignalError::InvalidInput("x".to_string()).into();
        assert_eq!(err.to_string(), "신호 평가 실패: 잘못된 입력: x");
    }
}
