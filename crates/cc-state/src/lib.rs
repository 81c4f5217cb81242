//! cc-state: Undo/redo, presets, settings persistence and the edit session
//!
//! Everything here is host-independent: the timeline crate builds on the undo
//! manager, and front ends drive the edit session.

mod codec;
mod preset;
mod session;
mod store;
mod undo;

pub use codec::*;
pub use preset::*;
pub use session::*;
pub use store::*;
pub use undo::*;
