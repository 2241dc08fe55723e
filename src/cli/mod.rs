//! CLI command handlers

pub mod check;
pub mod context;
pub mod merge;
pub mod remind;
pub mod style;

pub use check::run_check;
pub use context::CommandContext;
pub use merge::{MergeOptions, run_merge};
pub use remind::{RemindOptions, run_remind};
