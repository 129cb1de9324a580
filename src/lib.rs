pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::ConfigFile;
pub use crate::core::{dispatcher::Dispatcher, executor::ShellExecutor};
pub use crate::domain::model::{Command, Configuration, CustomCommand, Module};
pub use crate::domain::ports::Executor;
pub use crate::utils::error::{ModrunError, Result};
