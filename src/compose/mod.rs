//! Compositing stages: padding, horizontal joining and the overflow counter.
//!
//! Every function here takes its inputs by reference and returns a fresh
//! [`ImageHandle`](crate::engine::ImageHandle); callers rebind instead of
//! observing hidden mutation.

pub mod join;
pub mod overflow;
pub mod padding;

pub use join::{join_horizontal, joined_width};
pub use overflow::{add_overflow, overflow_label, OverflowStyle};
pub use padding::pad;
