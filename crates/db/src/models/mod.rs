//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//!
//! Hazard result rows are immutable once written, so there are no update DTOs.

pub mod gmf;
pub mod gmf_rupture;
pub mod imt;
pub mod migration;
pub mod rupture;
