//! Ground motion field per rupture and IMT.

use hzrdr_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `hzrdr.gmf_rupture` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GmfRupture {
    pub id: DbId,
    /// References `hzrdr.ses_rupture`.
    pub rupture_id: DbId,
    pub gmf_id: DbId,
    pub imt_id: DbId,
    pub ground_motion_field: Vec<f64>,
}

/// DTO for storing the ground motion field of one rupture and IMT.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGmfRupture {
    pub rupture_id: DbId,
    pub gmf_id: DbId,
    pub imt_id: DbId,
    pub ground_motion_field: Vec<f64>,
}

/// Value of one site under one stochastic event set rupture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteGroundMotion {
    pub rupture_id: DbId,
    pub value: f64,
}
