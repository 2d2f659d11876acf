//! Intake configuration.
//!
//! Everything that used to be a hardcoded literal or a process-wide singleton (reference
//! timezone, weight tolerance, adjustment cutoff, log key, sheet names, mandatory indicators)
//! lives here and is passed explicitly to the pipeline.

use std::path::Path;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::adjustment::AdjustmentPolicy;
use crate::error::{IntakeError, IntakeResult};
use crate::scorecard::SubmissionKind;
use crate::workbook::Workbook;

/// Accepted range for the sum of an identity's weights, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTolerance {
    /// Lowest accepted sum.
    pub min: f64,
    /// Highest accepted sum.
    pub max: f64,
}

impl Default for WeightTolerance {
    fn default() -> Self {
        Self { min: 0.99, max: 1.10 }
    }
}

impl WeightTolerance {
    pub fn contains(&self, sum: f64) -> bool {
        self.min <= sum && sum <= self.max
    }
}

/// Indicators that must be present in a sheet whose kind/role/segment match the selectors.
///
/// A selector left as `None` matches anything. Role and segment compare case-insensitively
/// after trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredIndicatorRule {
    /// Only sheets of this kind.
    #[serde(default)]
    pub kind: Option<SubmissionKind>,
    /// Only sheets with this segment.
    #[serde(default)]
    pub segment: Option<String>,
    /// Only sheets with this role.
    #[serde(default)]
    pub role: Option<String>,
    /// Indicator names that must appear in the sheet.
    pub indicators: Vec<String>,
}

impl RequiredIndicatorRule {
    fn matches(&self, kind: SubmissionKind, role: &str, segment: &str) -> bool {
        let eq = |want: &Option<String>, got: &str| {
            want.as_deref()
                .is_none_or(|w| w.trim().eq_ignore_ascii_case(got.trim()))
        };
        self.kind.is_none_or(|k| k == kind) && eq(&self.role, role) && eq(&self.segment, segment)
    }
}

/// Top-level configuration, usually loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Offset of the reference civil timezone from UTC, in minutes.
    pub utc_offset_minutes: i32,
    /// Accepted range for each sheet's weight sum.
    pub weight_tolerance: WeightTolerance,
    /// When a submission counts as a late adjustment.
    pub adjustment: AdjustmentPolicy,
    /// Key of the cumulative rejection log blob.
    pub rejection_log_key: String,
    /// Sheet name that carries the HR summary table in sellers workbooks.
    pub hr_summary_sheet: String,
    /// A branch segment containing this marker selects [`SubmissionKind::Sellers`].
    pub sellers_branch_marker: String,
    /// Kind used when neither the branch nor the first sheet's layout decides it.
    pub default_kind: SubmissionKind,
    /// Fixed-form compensation cells may be left empty.
    pub allow_empty_compensation: bool,
    /// Prefix persisted CSV blobs with a UTF-8 byte order mark.
    pub write_bom: bool,
    /// Mandatory indicators, unioned over every matching rule.
    pub required_indicators: Vec<RequiredIndicatorRule>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            // America/Argentina/Buenos_Aires, no DST.
            utc_offset_minutes: -180,
            weight_tolerance: WeightTolerance::default(),
            adjustment: AdjustmentPolicy::Cutoff {
                date: NaiveDate::from_ymd_opt(2025, 4, 23).unwrap_or_default(),
            },
            rejection_log_key: "Errores.txt".to_string(),
            hr_summary_sheet: "Resumen RRHH".to_string(),
            sellers_branch_marker: "Vendedores".to_string(),
            default_kind: SubmissionKind::Form,
            allow_empty_compensation: false,
            write_bom: true,
            required_indicators: Vec::new(),
        }
    }
}

impl IntakeConfig {
    /// Load a configuration file. Missing keys take their default values.
    pub fn from_path(path: impl AsRef<Path>) -> IntakeResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> IntakeResult<Self> {
        let config: IntakeConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> IntakeResult<()> {
        self.reference_offset()?;
        if !(self.weight_tolerance.min <= self.weight_tolerance.max) {
            return Err(IntakeError::InvalidConfig {
                message: format!(
                    "weight_tolerance.min ({}) must not exceed weight_tolerance.max ({})",
                    self.weight_tolerance.min, self.weight_tolerance.max
                ),
            });
        }
        if self.rejection_log_key.trim().is_empty() {
            return Err(IntakeError::InvalidConfig {
                message: "rejection_log_key must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The reference timezone as a fixed offset.
    pub fn reference_offset(&self) -> IntakeResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            IntakeError::InvalidConfig {
                message: format!("utc_offset_minutes {} is out of range", self.utc_offset_minutes),
            }
        })
    }

    /// `true` when a filename's branch segment carries the sellers marker.
    pub fn is_sellers_branch(&self, branch: &str) -> bool {
        !self.sellers_branch_marker.is_empty() && branch.contains(&self.sellers_branch_marker)
    }

    /// Pick the submission kind: the sellers marker in the branch first, then the layout of
    /// the workbook's first sheet, then `default_kind`.
    pub fn resolve_kind(&self, branch: &str, workbook: &Workbook) -> SubmissionKind {
        if self.is_sellers_branch(branch) {
            return SubmissionKind::Sellers;
        }
        workbook
            .sheets
            .first()
            .and_then(SubmissionKind::infer_from_sheet)
            .unwrap_or(self.default_kind)
    }

    /// Union of the indicators required for a sheet, in rule order, without repeats.
    pub fn required_indicators_for(
        &self,
        kind: SubmissionKind,
        role: &str,
        segment: &str,
    ) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for rule in self
            .required_indicators
            .iter()
            .filter(|r| r.matches(kind, role, segment))
        {
            for name in &rule.indicators {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use crate::workbook::Sheet;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = IntakeConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, IntakeConfig::default());
        assert_eq!(cfg.reference_offset().unwrap().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn adjustment_policy_is_tagged_by_mode() {
        let cfg = IntakeConfig::from_json_str(
            r#"{"adjustment": {"mode": "period_offset", "days": 50}, "weight_tolerance": {"min": 1.0, "max": 1.0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.adjustment, AdjustmentPolicy::PeriodOffset { days: 50 });
        assert!(cfg.weight_tolerance.contains(1.0));
        assert!(!cfg.weight_tolerance.contains(1.01));
    }

    #[test]
    fn inverted_tolerance_is_rejected() {
        let err = IntakeConfig::from_json_str(r#"{"weight_tolerance": {"min": 1.2, "max": 1.0}}"#)
            .unwrap_err();
        assert!(matches!(err, IntakeError::InvalidConfig { .. }));
    }

    #[test]
    fn kind_comes_from_marker_then_layout_then_default() {
        let cfg = IntakeConfig::default();
        let leaders = Workbook::new(vec![Sheet::new(
            "Juan",
            vec![vec![Value::from("Gerente_Jujuy_20301508493")]],
        )]);
        assert_eq!(cfg.resolve_kind("Jujuy Vendedores", &leaders), SubmissionKind::Sellers);
        assert_eq!(cfg.resolve_kind("Jujuy", &leaders), SubmissionKind::Leaders);

        let undecided = Workbook::new(vec![Sheet::new("x", vec![vec![Value::from("Tablero")]])]);
        assert_eq!(cfg.resolve_kind("Jujuy", &undecided), SubmissionKind::Form);
        assert_eq!(cfg.resolve_kind("Jujuy", &Workbook::default()), SubmissionKind::Form);
    }

    #[test]
    fn required_indicator_rules_union_matching_selectors() {
        let cfg = IntakeConfig::from_json_str(
            r#"{"required_indicators": [
                {"indicators": ["Ausentismo"]},
                {"kind": "form", "segment": "Postventa", "indicators": ["NPS", "Ausentismo"]},
                {"kind": "sellers", "indicators": ["Ventas"]},
                {"role": "Gerente", "indicators": ["Rentabilidad"]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            cfg.required_indicators_for(SubmissionKind::Form, "Jefe", "postventa "),
            vec!["Ausentismo".to_string(), "NPS".to_string()]
        );
        assert_eq!(
            cfg.required_indicators_for(SubmissionKind::Sellers, "Vendedor", ""),
            vec!["Ausentismo".to_string(), "Ventas".to_string()]
        );
        assert_eq!(
            cfg.required_indicators_for(SubmissionKind::Leaders, "gerente", "Ventas"),
            vec!["Ausentismo".to_string(), "Rentabilidad".to_string()]
        );
    }
}
