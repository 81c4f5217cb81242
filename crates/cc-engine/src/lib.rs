//! cc-engine: Timeline port, in-memory timeline, splice transform and batch
//!
//! ## Flow
//!
//! ```text
//! SliderValues -> SpliceParams -> apply_all -> apply_splice (per segment)
//!                                     |
//!                                Transaction -> TimelinePort
//! ```

mod batch;
mod splice;
mod timeline;
mod track_manager;

pub use batch::*;
pub use splice::*;
pub use timeline::*;
pub use track_manager::*;
