//! Automatic column layout for tiling window managers.
//!
//! Windows are arranged into vertical columns: a master column on the left
//! and stack columns holding up to `max_stack` windows each. See
//! [`layout_engine::OmniLayout`].

pub mod common;
pub mod layout_engine;
pub mod model;
