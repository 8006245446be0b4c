//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Only INSERT and SELECT are issued
//! against `hzrdr.imt` and `hzrdr.gmf_rupture`; removal of their rows happens
//! through cascades from the owning ruptures and fields.

pub mod gmf_repo;
pub mod gmf_rupture_repo;
pub mod imt_repo;
pub mod rupture_repo;

pub use gmf_repo::GmfRepo;
pub use gmf_rupture_repo::GmfRuptureRepo;
pub use imt_repo::ImtRepo;
pub use rupture_repo::{ProbabilisticRuptureRepo, SesRuptureRepo};
