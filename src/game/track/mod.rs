//! Camel track module.
//!
//! Owns camel positions, stacking, and spectator tile placement.

pub mod track;

pub use track::*;
