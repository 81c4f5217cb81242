//! cc-core: Shared types and parameter math for Chorus Crisp
//!
//! This crate provides the foundational types used across all Chorus Crisp crates:
//! timeline time values, fade curves, slider/physical parameter tuples and the
//! splice/duck conversion functions.

mod error;
mod fade;
mod gain;
mod params;
mod time;

pub use error::*;
pub use fade::*;
pub use gain::*;
pub use params::*;
pub use time::*;
