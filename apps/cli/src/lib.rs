//! learnkit CLI: run learning tasks over files or stdin and print JSON.

pub use cmd::{Cli, Command};

pub mod batch;
pub mod cmd;
pub mod input;
