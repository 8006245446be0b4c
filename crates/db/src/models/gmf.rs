//! Ground motion field container model and DTO.

use hzrdr_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `hzrdr.gmf` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gmf {
    pub id: DbId,
    pub display_name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new ground motion field container.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGmf {
    pub display_name: String,
}
