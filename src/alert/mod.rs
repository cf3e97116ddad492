// 알림 모듈
// 알림 결정을 메시지로 렌더링하고 외부 전송기로 넘깁니다.

pub mod dispatch;
pub mod formatter;

pub use dispatch::{DispatchError, Dispatcher, LogDispatcher};
pub use formatter::format;
