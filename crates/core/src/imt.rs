//! Intensity measure types (IMTs).
//!
//! An [`Imt`] mirrors one row of `hzrdr.imt`: a short type code plus, for
//! spectral acceleration only, a period and a damping. Every constructor
//! applies the same presence rule the table's CHECK constraints apply, so a
//! value of this type can always be stored.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Damping (percent of critical) assumed when an SA string carries only a period.
pub const DEFAULT_SA_DAMPING: f64 = 5.0;

/// Short code of the only IMT that carries a period and a damping.
pub const SA_CODE: &str = "SA";

/* --------------------------------------------------------------------------
Kinds
-------------------------------------------------------------------------- */

/// Short type code of an intensity measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImtKind {
    /// Peak ground acceleration.
    Pga,
    /// Peak ground velocity.
    Pgv,
    /// Peak ground displacement.
    Pgd,
    /// Arias intensity.
    Ia,
    /// Relative significant duration.
    Rsd,
    /// Modified Mercalli intensity.
    Mmi,
    /// Spectral acceleration.
    Sa,
}

impl ImtKind {
    pub const ALL: [ImtKind; 7] = [
        ImtKind::Pga,
        ImtKind::Pgv,
        ImtKind::Pgd,
        ImtKind::Ia,
        ImtKind::Rsd,
        ImtKind::Mmi,
        ImtKind::Sa,
    ];

    /// The code stored in `hzrdr.imt.im_type`.
    pub fn code(self) -> &'static str {
        match self {
            ImtKind::Pga => "PGA",
            ImtKind::Pgv => "PGV",
            ImtKind::Pgd => "PGD",
            ImtKind::Ia => "IA",
            ImtKind::Rsd => "RSD",
            ImtKind::Mmi => "MMI",
            ImtKind::Sa => SA_CODE,
        }
    }

    /// Whether this kind requires a period and a damping.
    pub fn is_spectral(self) -> bool {
        matches!(self, ImtKind::Sa)
    }
}

impl fmt::Display for ImtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ImtKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImtKind::ALL
            .into_iter()
            .find(|kind| kind.code() == s)
            .ok_or_else(|| {
                let codes: Vec<&str> = ImtKind::ALL.iter().map(|k| k.code()).collect();
                CoreError::Validation(format!(
                    "Unknown intensity measure type '{s}'. Valid types: {}",
                    codes.join(", ")
                ))
            })
    }
}

/* --------------------------------------------------------------------------
Intensity measure type
-------------------------------------------------------------------------- */

/// A validated intensity measure type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imt {
    kind: ImtKind,
    sa_period: Option<f64>,
    sa_damping: Option<f64>,
}

impl Imt {
    /// A period-independent IMT. Rejects [`ImtKind::Sa`].
    pub fn simple(kind: ImtKind) -> Result<Self, CoreError> {
        if kind.is_spectral() {
            return Err(CoreError::Validation(
                "SA requires a period and a damping".to_string(),
            ));
        }
        Ok(Self {
            kind,
            sa_period: None,
            sa_damping: None,
        })
    }

    /// A spectral acceleration IMT. Period and damping must be finite and positive.
    pub fn sa(period: f64, damping: f64) -> Result<Self, CoreError> {
        validate_positive("SA period", period)?;
        validate_positive("SA damping", damping)?;
        Ok(Self {
            kind: ImtKind::Sa,
            sa_period: Some(period),
            sa_damping: Some(damping),
        })
    }

    /// Rebuild an IMT from the columns of an `hzrdr.imt` row.
    ///
    /// Period and damping must both be present for `SA` and both absent
    /// for every other code.
    pub fn from_components(
        im_type: &str,
        sa_period: Option<f64>,
        sa_damping: Option<f64>,
    ) -> Result<Self, CoreError> {
        let kind: ImtKind = im_type.parse()?;
        match (kind.is_spectral(), sa_period, sa_damping) {
            (true, Some(period), Some(damping)) => Imt::sa(period, damping),
            (true, _, _) => Err(CoreError::Validation(format!(
                "{im_type} requires both sa_period and sa_damping"
            ))),
            (false, None, None) => Imt::simple(kind),
            (false, _, _) => Err(CoreError::Validation(format!(
                "{im_type} must not carry sa_period or sa_damping"
            ))),
        }
    }

    pub fn kind(&self) -> ImtKind {
        self.kind
    }

    pub fn sa_period(&self) -> Option<f64> {
        self.sa_period
    }

    pub fn sa_damping(&self) -> Option<f64> {
        self.sa_damping
    }
}

fn validate_positive(what: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{what} must be a positive finite number (got {value})"
        )))
    }
}

/// Renders the canonical `imt_str`, e.g. `PGA`, `SA(0.1)` or `SA(0.1, 10)`.
///
/// Damping is rendered only when it differs from [`DEFAULT_SA_DAMPING`].
/// Numbers use Rust's shortest float formatting, so `1.0` renders as `SA(1)`.
impl fmt::Display for Imt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.sa_period, self.sa_damping) {
            (Some(period), Some(damping)) if damping != DEFAULT_SA_DAMPING => {
                write!(f, "{}({period}, {damping})", self.kind.code())
            }
            (Some(period), _) => write!(f, "{}({period})", self.kind.code()),
            _ => f.write_str(self.kind.code()),
        }
    }
}

/// Parses `PGA`-style codes, `SA(<period>)` with [`DEFAULT_SA_DAMPING`],
/// and `SA(<period>, <damping>)`.
impl FromStr for Imt {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix(SA_CODE) {
            if let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
                let number = |text: &str| {
                    text.trim().parse::<f64>().map_err(|_| {
                        CoreError::Validation(format!("Invalid SA parameters in '{s}'"))
                    })
                };
                return match inner.split_once(',') {
                    Some((period, damping)) => Imt::sa(number(period)?, number(damping)?),
                    None => Imt::sa(number(inner)?, DEFAULT_SA_DAMPING),
                };
            }
            if rest.is_empty() {
                return Err(CoreError::Validation(
                    "SA requires a period, e.g. SA(0.1)".to_string(),
                ));
            }
        }
        Imt::simple(s.parse()?)
    }
}

/* --------------------------------------------------------------------------
Seed data
-------------------------------------------------------------------------- */

/// One row of the reference data `hzrdr.imt` is seeded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedImt {
    pub imt_str: &'static str,
    pub im_type: &'static str,
    pub sa_period: Option<f64>,
    pub sa_damping: Option<f64>,
}

impl SeedImt {
    const fn simple(code: &'static str) -> Self {
        Self {
            imt_str: code,
            im_type: code,
            sa_period: None,
            sa_damping: None,
        }
    }

    pub fn to_imt(&self) -> Result<Imt, CoreError> {
        Imt::from_components(self.im_type, self.sa_period, self.sa_damping)
    }
}

/// Six period-independent types plus one spectral acceleration example.
pub const SEED_IMTS: [SeedImt; 7] = [
    SeedImt::simple("PGA"),
    SeedImt::simple("PGV"),
    SeedImt::simple("PGD"),
    SeedImt::simple("IA"),
    SeedImt::simple("RSD"),
    SeedImt::simple("MMI"),
    SeedImt {
        imt_str: "SA(0.1)",
        im_type: SA_CODE,
        sa_period: Some(0.1),
        sa_damping: Some(DEFAULT_SA_DAMPING),
    },
];

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- parsing --

    #[test]
    fn parses_period_independent_codes() {
        for kind in ImtKind::ALL.into_iter().filter(|k| !k.is_spectral()) {
            let imt: Imt = kind.code().parse().unwrap();
            assert_eq!(imt.kind(), kind);
            assert_eq!(imt.sa_period(), None);
            assert_eq!(imt.sa_damping(), None);
        }
    }

    #[test]
    fn parses_sa_with_default_damping() {
        let imt: Imt = "SA(0.1)".parse().unwrap();
        assert_eq!(imt.kind(), ImtKind::Sa);
        assert_eq!(imt.sa_period(), Some(0.1));
        assert_eq!(imt.sa_damping(), Some(DEFAULT_SA_DAMPING));
    }

    #[test]
    fn sa_period_renderings_parse_to_the_same_imt() {
        let a: Imt = "SA(1.0)".parse().unwrap();
        let b: Imt = " SA(1) ".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parses_sa_with_explicit_damping() {
        let imt: Imt = "SA(0.2, 10)".parse().unwrap();
        assert_eq!(imt.sa_period(), Some(0.2));
        assert_eq!(imt.sa_damping(), Some(10.0));
    }

    #[test]
    fn bare_sa_rejected() {
        assert_matches!("SA".parse::<Imt>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn malformed_sa_rejected() {
        assert!("SA(abc)".parse::<Imt>().is_err());
        assert!("SA(0.1".parse::<Imt>().is_err());
        assert!("SA(-0.5)".parse::<Imt>().is_err());
        assert!("SA(0)".parse::<Imt>().is_err());
        assert!("SA(0.1, x)".parse::<Imt>().is_err());
    }

    #[test]
    fn unknown_code_rejected() {
        let msg = "CAV".parse::<Imt>().unwrap_err().to_string();
        assert!(msg.contains("Unknown intensity measure type"));
        assert!("pga".parse::<Imt>().is_err());
    }

    // -- rendering --

    #[test]
    fn renders_canonical_strings() {
        assert_eq!(Imt::simple(ImtKind::Mmi).unwrap().to_string(), "MMI");
        assert_eq!(Imt::sa(0.1, 5.0).unwrap().to_string(), "SA(0.1)");
        assert_eq!(Imt::sa(1.0, 5.0).unwrap().to_string(), "SA(1)");
        assert_eq!(Imt::sa(0.25, 10.0).unwrap().to_string(), "SA(0.25, 10)");
    }

    // -- presence invariant --

    #[test]
    fn simple_rejects_sa() {
        assert_matches!(Imt::simple(ImtKind::Sa), Err(CoreError::Validation(_)));
    }

    #[test]
    fn sa_requires_positive_finite_values() {
        assert!(Imt::sa(f64::NAN, 5.0).is_err());
        assert!(Imt::sa(0.1, f64::INFINITY).is_err());
        assert!(Imt::sa(0.1, 0.0).is_err());
    }

    #[test]
    fn components_sa_without_period_rejected() {
        assert!(Imt::from_components("SA", None, Some(5.0)).is_err());
        assert!(Imt::from_components("SA", Some(0.1), None).is_err());
        assert!(Imt::from_components("SA", None, None).is_err());
    }

    #[test]
    fn components_non_sa_with_period_rejected() {
        assert!(Imt::from_components("PGA", Some(0.1), None).is_err());
        assert!(Imt::from_components("PGV", None, Some(5.0)).is_err());
    }

    #[test]
    fn components_valid_rows_accepted() {
        let sa = Imt::from_components("SA", Some(0.2), Some(5.0)).unwrap();
        assert_eq!(sa.kind(), ImtKind::Sa);
        let pgd = Imt::from_components("PGD", None, None).unwrap();
        assert_eq!(pgd.kind(), ImtKind::Pgd);
    }

    // -- seed data --

    #[test]
    fn seed_rows_are_valid_and_render_their_imt_str() {
        for seed in SEED_IMTS {
            let imt = seed.to_imt().unwrap();
            assert_eq!(imt.to_string(), seed.imt_str);
            assert_eq!(imt.kind().code(), seed.im_type);
        }
    }

    #[test]
    fn seed_contains_one_spectral_entry() {
        let spectral: Vec<_> = SEED_IMTS
            .iter()
            .filter(|s| s.im_type == SA_CODE)
            .collect();
        assert_eq!(spectral.len(), 1);
        assert_eq!(spectral[0].sa_period, Some(0.1));
        assert_eq!(spectral[0].sa_damping, Some(5.0));
    }
}
