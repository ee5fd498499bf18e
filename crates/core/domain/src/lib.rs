pub mod device;
pub mod history;
pub mod stats;
pub mod time;

pub use device::{DeviceRecord, DeviceStatus};
pub use history::{HistoryMap, Reachability, StatusEvent};
pub use stats::{GroupSummary, ReplayStats, Summary, format_duration};
pub use time::{DEFAULT_TIMEZONE, now_in, parse_timezone, to_timezone};
