//! Domain logic for hazard results: intensity measure types and the
//! per-site lookup of ground motion values stored per rupture.

pub mod error;
pub mod ground_motion;
pub mod imt;
pub mod types;
