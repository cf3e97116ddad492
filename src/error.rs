/// 신호 평가 오류
///
/// 두 경우 모두 호출자에게 전달되는 복구 가능한 로컬 오류이며,
/// 오류가 발생하면 부분적인 결정은 만들어지지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalError {
    /// 평가에 필요한 최소 캔들 수 미달
    InsufficientData { required: usize, actual: usize },
    /// 잘못된 입력 (비단조 시간, 음수/비유한 가격 등)
    InvalidInput(String),
}

impl std::fmt::Display for SignalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalError::InsufficientData { required, actual } => write!(
                f,
                "데이터 부족: 최소 {}개 캔들이 필요하지만 {}개만 있습니다",
                required, actual
            ),
            SignalError::InvalidInput(msg) => write!(f, "잘못된 입력: {}", msg),
        }
    }
}

impl std::error::Error for SignalError {}

/// 신호 평가 결과
pub type SignalResult<T> = Result<T, SignalError>;
