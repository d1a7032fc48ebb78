//! 故障信号的拦截与转交
//!
//! - [`disposition`]：处理方式的带标签表示
//! - [`registry`]：保存 init 之前的处理方式，负责安装与回滚
//! - [`handler`]：故障处理函数本体
pub mod disposition;
pub mod handler;
pub mod registry;

pub use disposition::{Disposition, InfoHandler, SimpleHandler};
pub use handler::fault_handler;
pub use registry::{HandlerRegistry, LibcSignals, SignalOs};
