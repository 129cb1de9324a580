pub mod dispatcher;
pub mod executor;
pub mod lifecycle;
pub mod printer;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Command, Configuration, CustomCommand, Module};
pub use crate::domain::ports::Executor;
pub use crate::utils::error::Result;
