pub mod error;
pub mod output;
pub mod types;

pub use error::RestyleError;
pub use output::{OutputFormat, OutputWriter};
pub use types::{FileOutcome, FileStatus, RunReport};
