//! Storyline Project Model
//!
//! Defines the core data contracts for the timeline editor:
//! - **Clip:** A placed media reference with timing, trim range, and properties
//! - **Track:** An ordered lane of clips of one media category
//! - **Project:** Tracks, playhead, derived total duration, and output format
//! - **Scene:** Upstream scene descriptors exchanged with the content pipeline
//!
//! All times are fractional seconds. Clip start times are project-relative;
//! trim points are relative to the clip's source media.

pub mod clip;
pub mod geometry;
pub mod project;
pub mod scene;
pub mod track;

pub use clip::*;
pub use geometry::*;
pub use project::*;
pub use scene::*;
pub use track::*;
