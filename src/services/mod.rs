pub mod pending;
pub mod quota;
pub mod report_writer;

pub use pending::select_pending;
pub use quota::{has_quota_remaining, remaining_quota, rollover_if_new_day};
pub use report_writer::{generate_report, ReportWriter};
