// crates/addendum-cli/src/lib.rs
#![feature(error_generic_member_access)]

pub mod config;
pub mod pipeline;

pub use config::{AddendumConfig, ConfigError};
pub use pipeline::{run_pipeline, Args, CliError, Outcome};
