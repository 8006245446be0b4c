//! Intensity measure type entity model.

use hzrdr_core::error::CoreError;
use hzrdr_core::imt::Imt;
use hzrdr_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `hzrdr.imt` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IntensityMeasureType {
    pub id: DbId,
    pub imt_str: String,
    pub im_type: String,
    pub sa_period: Option<f64>,
    pub sa_damping: Option<f64>,
}

impl IntensityMeasureType {
    /// Interpret the row as a domain IMT, checking the presence rule.
    pub fn to_imt(&self) -> Result<Imt, CoreError> {
        Imt::from_components(&self.im_type, self.sa_period, self.sa_damping)
    }
}
