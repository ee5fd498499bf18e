//! 内存存储实现模块
//!
//! 进程退出即丢失，仅用于测试和演示。

pub mod history;

pub use history::*;
