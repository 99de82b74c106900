//! Client-facing state: the cached balance view and the change feed.
//!
//! - [`Session`] — last-known balance per logged-in player
//! - [`Bus`] — broadcast of committed [`Event`]s
mod event;
#[allow(clippy::module_inception)]
mod session;

pub use event::*;
pub use session::*;
