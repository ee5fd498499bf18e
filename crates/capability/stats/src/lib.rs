//! 在线汇总与历史回放。
//!
//! 两者都是纯函数，不做探测也不读写存储。

mod replay;
mod summary;

pub use replay::compute_stats;
pub use summary::summarize;
