use crate::analyzer::signal_strength_analyzer::Priority;

/// 알림 전송 오류
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchError(pub String);

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "알림 전송 실패: {}", self.0)
    }
}

impl std::error::Error for DispatchError {}

/// 알림 전송 인터페이스
///
/// 자격 증명 같은 설정은 구현체 생성 시 주입합니다.
/// 엔진은 전송 결과에 의존하지 않습니다.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, message: &str, priority: Priority) -> Result<(), DispatchError>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for &D {
    fn dispatch(&self, message: &str, priority: Priority) -> Result<(), DispatchError> {
        (**self).dispatch(message, priority)
    }
}

/// 로그로만 알림을 남기는 기본 전송기
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher {
    /// 로그 앞에 붙는 채널 이름
    pub channel: String,
}

impl LogDispatcher {
    pub fn new(channel: impl Into<String>) -> Self {
        LogDispatcher {
            channel: channel.into(),
        }
    }
}

impl Dispatcher for LogDispatcher {
    fn dispatch(&self, message: &str, priority: Priority) -> Result<(), DispatchError> {
        match priority {
            Priority::High => log::warn!("[{}][{}]\n{}", self.channel, priority, message),
            Priority::None => log::debug!("[{}][{}]\n{}", self.channel, priority, message),
            _ => log::info!("[{}][{}]\n{}", self.channel, priority, message),
        }
        Ok(())
    }
}
