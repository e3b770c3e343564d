//! Plume Core Types
//!
//! This crate provides the shared vocabulary for the Plume recording layer:
//!
//! - **Colors**: RGBA color in linear space with common constants
//! - **Handles**: opaque references to gradients, image patterns, images,
//!   fonts, and interned strings
//! - **Styles**: stroke caps/joins, clip combination rules, and text
//!   alignment flags
//!
//! All of these types have a stable wire representation; the encoding itself
//! lives in `plume_shape`.

pub mod color;
pub mod handle;
pub mod style;

pub use color::Color;
pub use handle::{Font, GradientHandle, ImageHandle, ImagePatternHandle, StringId};
pub use style::{Alignment, ClipRule, LineCap, LineJoin};
