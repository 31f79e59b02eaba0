//! Game entities module.
//!
//! This module organizes player and pyramid entity logic.

pub mod player;
pub mod pyramid;

pub use player::*;
pub use pyramid::*;
