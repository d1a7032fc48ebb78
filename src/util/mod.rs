//! 工具函数模块
//!
//! 故障处理函数能用到的全部底层原语都集中在这里。
pub mod fmt;
pub mod stdio;
pub mod sys;

pub use fmt::DecimalBuf;
pub use stdio::{FixedBuf, RawWrite, Stderr};
