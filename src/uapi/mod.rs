//! 与宿主平台共用的定义
//!
//! 包含信号编号、处理标志等常量，确保本设施与操作系统 ABI 的一致性

pub mod signal;
