use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// 설정 로드 오류
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 파일 오류
    FileError(String),
    /// 파싱 오류
    ParseError(String),
    /// 유효성 검사 오류
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileError(msg) => write!(f, "설정 파일 오류: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "설정 파싱 오류: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "설정 유효성 검사 오류: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 설정 로드 결과
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 설정 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    /// 자동 감지 (파일은 확장자, 문자열은 JSON 후 TOML 순으로 시도)
    Auto,
}

/// 설정 유효성 검사 트레이트
pub trait ConfigValidation {
    fn validate(&self) -> ConfigResult<()>;
}

/// 설정 파일 로더
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// 파일에서 설정 로드
    ///
    /// # Arguments
    /// * `path` - 설정 파일 경로
    /// * `format` - 설정 파일 형식 (`Auto`면 확장자로 감지)
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 검증된 설정 객체 또는 오류
    pub fn load_from_file<T>(path: &Path, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        debug!("설정 파일 로드 시작: {}", path.display());

        let format = match format {
            ConfigFormat::Auto => Self::detect_format(path)?,
            format => format,
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!("설정 파일 읽기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 읽기 실패: {}", e))
        })?;

        let config = Self::load_from_string(&content, format).inspect_err(|e| {
            error!("설정 파일 로드 실패: {} - {}", path.display(), e);
        })?;

        info!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 문자열에서 설정 로드
    pub fn load_from_string<T>(content: &str, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(content)?,
            ConfigFormat::Toml => Self::parse_toml(content)?,
            ConfigFormat::Auto => match Self::parse_json::<T>(content) {
                Ok(config) => config,
                Err(_) => Self::parse_toml(content)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 파일이 있으면 로드하고, 없으면 기본 설정 반환
    pub fn load_or_default<T>(path: &Path) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation + Default,
    {
        if !path.exists() {
            warn!(
                "설정 파일이 없어 기본 설정을 사용합니다: {}",
                path.display()
            );
            return Ok(T::default());
        }

        Self::load_from_file(path, ConfigFormat::Auto)
    }

    /// 설정 파일 저장
    ///
    /// `Auto`이면 확장자로 형식을 정하고, 확장자가 없으면 TOML로 저장합니다.
    pub fn save_to_file<T>(config: &T, path: &Path, format: ConfigFormat) -> ConfigResult<()>
    where
        T: Serialize + ConfigValidation,
    {
        config.validate()?;

        let format = match format {
            ConfigFormat::Auto => Self::detect_format(path).unwrap_or(ConfigFormat::Toml),
            format => format,
        };

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("JSON 직렬화 실패: {}", e)))?,
            _ => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("TOML 직렬화 실패: {}", e)))?,
        };

        std::fs::write(path, content).map_err(|e| {
            error!("설정 파일 쓰기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 쓰기 실패: {}", e))
        })?;

        info!("설정 파일 저장 완료: {}", path.display());
        Ok(())
    }

    fn parse_json<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        serde_json::from_str(content).map_err(|e| {
            warn!("JSON 파싱 실패: {}", e);
            ConfigError::ParseError(format!("JSON 파싱 실패: {}", e))
        })
    }

    fn parse_toml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        toml::from_str(content).map_err(|e| {
            warn!("TOML 파싱 실패: {}", e);
            ConfigError::ParseError(format!("TOML 파싱 실패: {}", e))
        })
    }

    /// 확장자로 파일 형식 감지
    fn detect_format(path: &Path) -> ConfigResult<ConfigFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => {
                warn!("지원되지 않는 파일 형식: {}", path.display());
                Err(ConfigError::FileError(format!(
                    "파일 형식을 감지할 수 없음: {}",
                    path.display()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::regime_analyzer::ScoringPolicy;
    use crate::engine::EngineConfig;
    use crate::monitor::MonitorConfig;
    use tempfile::TempDir;

    #[test]
    fn test_load_engine_config_from_toml() {
        let toml_str = r#"
            scoring_policy = "penalize"
            min_coverage = 60

            [thresholds]
            strong = 85
            confirmed = 65
            watch = 45
        "#;
        let config =
            ConfigLoader::load_from_string::<EngineConfig>(toml_str, ConfigFormat::Toml).unwrap();
        assert_eq!(config.scoring_policy, ScoringPolicy::Penalize);
        assert_eq!(config.min_coverage, 60);
        assert_eq!(config.thresholds.strong, 85);
        assert_eq!(config.thresholds.watch, 45);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{"symbol":"ETH/USDT","engine":{"thresholds":{"watch":40}}}"#;
        let config =
            ConfigLoader::load_from_string::<MonitorConfig>(json, ConfigFormat::Auto).unwrap();
        assert_eq!(config.symbol, "ETH/USDT");
        assert_eq!(config.timeframe, "1w");
        assert_eq!(config.engine.thresholds.strong, 90);
        assert_eq!(config.engine.thresholds.watch, 40);
        assert_eq!(config.engine.scoring_policy, ScoringPolicy::Normalize);
        assert_eq!(config.engine.min_coverage, 50);
    }

    #[test]
    fn test_validation_error() {
        let json = r#"{"thresholds":{"strong":50,"confirmed":70,"watch":90}}"#;
        let result = ConfigLoader::load_from_string::<EngineConfig>(json, ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = ConfigLoader::load_from_string::<EngineConfig>("{not json", ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let config = MonitorConfig {
            symbol: "ETH/USDT".to_string(),
            min_candles: 30,
            ..MonitorConfig::default()
        };

        let json_path = dir.path().join("monitor.json");
        ConfigLoader::save_to_file(&config, &json_path, ConfigFormat::Auto).unwrap();
        let loaded: MonitorConfig =
            ConfigLoader::load_from_file(&json_path, ConfigFormat::Auto).unwrap();
        assert_eq!(loaded, config);

        let toml_path = dir.path().join("monitor.toml");
        ConfigLoader::save_to_file(&config, &toml_path, ConfigFormat::Auto).unwrap();
        let loaded: MonitorConfig =
            ConfigLoader::load_from_file(&toml_path, ConfigFormat::Auto).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("monitor.yaml");
        std::fs::write(&path, "symbol: x").unwrap();
        let result = ConfigLoader::load_from_file::<MonitorConfig>(&path, ConfigFormat::Auto);
        assert!(matches!(result, Err(ConfigError::FileError(_))));

        let missing = dir.path().join("missing.toml");
        let config: MonitorConfig = ConfigLoader::load_or_default(&missing).unwrap();
        assert_eq!(config, MonitorConfig::default());
    }
}
