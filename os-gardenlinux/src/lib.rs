pub mod admission;
pub mod cli;
pub mod commands;
pub mod config;
pub mod decoder;
pub mod error;
pub mod generator;
pub mod resource;
pub mod utils;
pub mod validation;

pub use cli::{Cli, Commands};
pub use error::{DecodeError, Error, Result};

/// Machine image name of Garden Linux workers
pub const OS_TYPE_GARDEN_LINUX: &str = "gardenlinux";
