//! Handlers 模块

pub mod catalog;
pub mod fleet;
pub mod health;
pub mod history;
pub mod metrics;

pub use catalog::*;
pub use fleet::*;
pub use health::*;
pub use history::*;
pub use metrics::*;
