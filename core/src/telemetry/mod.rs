pub mod log;
pub mod metrics;

pub use self::log::RequestLog;
pub use metrics::{MetricsRecorder, MetricsSnapshot};
