//! The play pipeline.
//!
//! - [`Machine`] — validate, draw, evaluate, settle
//! - [`Spin`] — result of one successful play
//! - [`Phase`] — request progress, for tracing
#[allow(clippy::module_inception)]
mod machine;
mod phase;
mod spin;

pub use machine::*;
pub use phase::*;
pub use spin::*;
