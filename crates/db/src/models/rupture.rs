//! Probabilistic and stochastic event set rupture models and DTOs.

use hzrdr_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `hzrdr.probabilistic_rupture` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProbabilisticRupture {
    pub id: DbId,
    pub magnitude: f64,
    pub rake: f64,
    pub tectonic_region_type: String,
    pub is_from_fault_source: bool,
    /// Sites of the computation's site collection this rupture affects.
    /// `None` means the whole collection, in collection order.
    pub site_indices: Option<Vec<i32>>,
    pub created_at: Timestamp,
}

/// DTO for creating a new probabilistic rupture.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProbabilisticRupture {
    pub magnitude: f64,
    pub rake: f64,
    pub tectonic_region_type: String,
    /// Defaults to `false` if omitted.
    pub is_from_fault_source: Option<bool>,
    pub site_indices: Option<Vec<i32>>,
}

/// A row from the `hzrdr.ses_rupture` table: one occurrence of a
/// probabilistic rupture within a stochastic event set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SesRupture {
    pub id: DbId,
    pub rupture_id: DbId,
    pub ses_id: i32,
    pub tag: String,
    pub seed: i32,
    pub created_at: Timestamp,
}

/// DTO for creating a new stochastic event set rupture.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSesRupture {
    pub rupture_id: DbId,
    pub ses_id: i32,
    pub tag: String,
    pub seed: i32,
}
