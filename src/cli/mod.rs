//! Interactive terminal front-end.
mod command;
mod repl;

pub use command::*;
pub use repl::*;
