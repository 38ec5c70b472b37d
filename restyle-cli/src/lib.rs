//! Batch rewriting of static site sources: ordered regex/literal rules swap
//! utility-class markup for semantic class names, across a list of files,
//! writing back only what changed.

pub mod core;
pub mod rewrite;
pub mod rules;

pub use crate::core::{FileStatus, RestyleError, RunReport};
pub use rewrite::{BatchRewriter, ReplacementMode, Targets};
pub use rules::{RuleSet, RuleSpec};
