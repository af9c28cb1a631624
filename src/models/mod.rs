pub mod backlog;
pub mod loaders;
pub mod submission_log;
pub mod timestamp;

pub use backlog::BacklogItem;
pub use loaders::{load_backlog, parse_backlog};
pub use submission_log::{EntryStatus, LogEntry, SubmissionLog};
