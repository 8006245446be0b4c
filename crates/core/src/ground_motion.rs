//! Per-site lookup of ground motion values stored per rupture.
//!
//! A row of `hzrdr.gmf_rupture` holds one value per affected site. When the
//! rupture records `site_indices`, the field is ordered like those indices;
//! otherwise the field covers the whole site collection positionally.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Ground motion values of several sites aligned on a common set of ruptures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedGroundMotion {
    /// Every rupture seen at any site, ascending.
    pub rupture_ids: Vec<DbId>,
    /// One entry per input site, in input order. Each vector is as long as
    /// `rupture_ids`, with `0.0` where the site has no value for a rupture.
    pub values: Vec<(i32, Vec<f64>)>,
}

impl AlignedGroundMotion {
    pub fn is_empty(&self) -> bool {
        self.rupture_ids.is_empty()
    }
}

/// Locate the value of `site` in one rupture's field.
pub fn value_for_site(site_indices: Option<&[i32]>, field: &[f64], site: i32) -> Option<f64> {
    let position = match site_indices {
        Some(indices) => indices.iter().position(|&i| i == site)?,
        None => usize::try_from(site).ok()?,
    };
    field.get(position).copied()
}

/// Check that a field can be stored against a rupture with the given site indices.
pub fn validate_field(site_indices: Option<&[i32]>, field: &[f64]) -> Result<(), CoreError> {
    if field.is_empty() {
        return Err(CoreError::Validation(
            "Ground motion field must contain at least one value".to_string(),
        ));
    }
    if let Some(bad) = field.iter().find(|v| !v.is_finite()) {
        return Err(CoreError::Validation(format!(
            "Ground motion values must be finite (got {bad})"
        )));
    }
    if let Some(indices) = site_indices {
        if indices.len() != field.len() {
            return Err(CoreError::Validation(format!(
                "Ground motion field has {} values but the rupture affects {} sites",
                field.len(),
                indices.len()
            )));
        }
        validate_site_indices(indices)?;
    }
    Ok(())
}

/// Site indices must be non-negative and distinct.
pub fn validate_site_indices(indices: &[i32]) -> Result<(), CoreError> {
    if let Some(negative) = indices.iter().find(|&&i| i < 0) {
        return Err(CoreError::Validation(format!(
            "Site index must not be negative (got {negative})"
        )));
    }
    let distinct: BTreeSet<i32> = indices.iter().copied().collect();
    if distinct.len() != indices.len() {
        return Err(CoreError::Validation(
            "Rupture site indices contain duplicates".to_string(),
        ));
    }
    Ok(())
}

/// Align per-site `(rupture_id, value)` pairs on the sorted union of ruptures.
///
/// Sites that were not affected by a rupture get `0.0` for it. A rupture
/// listed twice for the same site keeps its last value.
pub fn align_by_rupture(per_site: &[(i32, Vec<(DbId, f64)>)]) -> AlignedGroundMotion {
    let rupture_ids: Vec<DbId> = per_site
        .iter()
        .flat_map(|(_, pairs)| pairs.iter().map(|(rupture_id, _)| *rupture_id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let values = per_site
        .iter()
        .map(|(site, pairs)| {
            let by_rupture: HashMap<DbId, f64> = pairs.iter().copied().collect();
            let row = rupture_ids
                .iter()
                .map(|id| by_rupture.get(id).copied().unwrap_or(0.0))
                .collect();
            (*site, row)
        })
        .collect();

    AlignedGroundMotion {
        rupture_ids,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- value_for_site --

    #[test]
    fn positional_lookup_without_site_indices() {
        let field = [0.1, 0.2, 0.3];
        assert_eq!(value_for_site(None, &field, 0), Some(0.1));
        assert_eq!(value_for_site(None, &field, 2), Some(0.3));
        assert_eq!(value_for_site(None, &field, 3), None);
        assert_eq!(value_for_site(None, &field, -1), None);
    }

    #[test]
    fn lookup_through_site_indices() {
        let indices = [4, 7, 9];
        let field = [0.4, 0.7, 0.9];
        assert_eq!(value_for_site(Some(&indices), &field, 7), Some(0.7));
        assert_eq!(value_for_site(Some(&indices), &field, 9), Some(0.9));
        assert_eq!(value_for_site(Some(&indices), &field, 0), None);
    }

    // -- validate_field --

    #[test]
    fn empty_field_rejected() {
        assert!(validate_field(None, &[]).is_err());
    }

    #[test]
    fn non_finite_value_rejected() {
        assert!(validate_field(None, &[0.1, f64::NAN]).is_err());
    }

    #[test]
    fn length_mismatch_rejected() {
        let msg = validate_field(Some(&[1, 2]), &[0.1])
            .unwrap_err()
            .to_string();
        assert!(msg.contains("1 values"));
    }

    #[test]
    fn duplicate_or_negative_indices_rejected() {
        assert!(validate_field(Some(&[1, 1]), &[0.1, 0.2]).is_err());
        assert!(validate_field(Some(&[-1, 2]), &[0.1, 0.2]).is_err());
    }

    #[test]
    fn empty_site_indices_accepted() {
        assert!(validate_site_indices(&[]).is_ok());
    }

    #[test]
    fn matching_field_accepted() {
        assert!(validate_field(Some(&[3, 5]), &[0.1, 0.2]).is_ok());
        assert!(validate_field(None, &[0.0]).is_ok());
    }

    // -- align_by_rupture --

    #[test]
    fn aligns_and_fills_missing_ruptures_with_zero() {
        let aligned = align_by_rupture(&[
            (1, vec![(30, 0.3), (10, 0.1)]),
            (2, vec![(20, 0.2)]),
        ]);
        assert_eq!(aligned.rupture_ids, vec![10, 20, 30]);
        assert_eq!(
            aligned.values,
            vec![(1, vec![0.1, 0.0, 0.3]), (2, vec![0.0, 0.2, 0.0])]
        );
    }

    #[test]
    fn site_without_values_gets_zero_row() {
        let aligned = align_by_rupture(&[(1, vec![(5, 0.5)]), (2, vec![])]);
        assert_eq!(aligned.values[1], (2, vec![0.0]));
    }

    #[test]
    fn no_ruptures_gives_empty_alignment() {
        let aligned = align_by_rupture(&[(1, vec![])]);
        assert!(aligned.is_empty());
        assert_eq!(aligned.values, vec![(1, vec![])]);
    }
}
