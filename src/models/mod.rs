pub mod challenge;
pub mod config;
pub mod filters;
pub mod language;
pub mod platform;
pub mod report;

pub use challenge::{strip_html, Challenge};
pub use config::{BackendConfig, UserConfig};
pub use filters::Filters;
pub use language::{CommentStyle, Language};
pub use platform::Platform;
pub use report::{ErrorClass, ErrorReport, Report, Statistics, SubmissionReport, Verdict};
