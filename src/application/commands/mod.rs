//! 应用层 - 命令（写操作）

mod toolkit_commands;

pub mod handlers;

pub use toolkit_commands::*;
