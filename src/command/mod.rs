//! Reversible commands and the linear undo history.

#[allow(clippy::module_inception)]
pub mod command;
pub mod history;

pub use command::Command;
pub use history::History;
