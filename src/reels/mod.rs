//! Reel symbols and the sources that draw them.
//!
//! - [`Symbol`] — One of the seven reel symbols
//! - [`Outcome`] — The ordered triple shown after a spin
//! - [`Source`] — Anything that can draw symbols
//! - [`Reels`] — Uniform, seedable source over an alphabet
//! - [`Rigged`] — Replays fixed outcomes for scenarios and tests
mod outcome;
mod source;
mod symbol;

pub use outcome::*;
pub use source::*;
pub use symbol::*;
