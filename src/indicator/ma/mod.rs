// 이동평균 지표 모듈

pub mod ema;

pub use ema::EMABuilder;
