//! Streaming ingestion of catalog exports.
//!
//! [`JsonTokenSource`] turns bytes into [`Token`]s, [`RecordReconstructor`]
//! turns tokens into typed records, and an [`ExportListener`] consumes them.
//! Only the record currently being assembled is held in memory.

pub mod json;
pub mod listener;
pub mod reconstruct;
pub mod stats;
pub mod token;

pub use json::{JsonTokenSource, tokenize_str};
pub use listener::{ExportListener, ListenerEvent, RecordingListener};
pub use reconstruct::{ExportLayout, RecordReconstructor, reconstruct, reconstruct_with_layout};
pub use stats::ExportStats;
pub use token::{Token, TokenSink};
