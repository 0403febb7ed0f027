//! Parameter schemas
//!
//! A schema is the ordered list of parameters one effect kind accepts, with
//! their types, valid ranges and defaults. Validation never clamps.

use serde::Serialize;

use super::kind::EffectKind;
use super::value::ParamValue;
use crate::error::{FxError, Result};

/// Semantic type and valid range of one parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamType {
    /// Finite number within `[min, max]`; integer literals are accepted
    Float { min: f64, max: f64 },
    /// One of a closed set of named constants
    Mode { variants: Vec<&'static str> },
}

/// One parameter of an effect kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub ty: ParamType,
    /// `None` marks the parameter as required
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    pub fn float(name: &'static str, min: f64, max: f64, default: ParamValue) -> Self {
        Self {
            name,
            ty: ParamType::Float { min, max },
            default: Some(default),
        }
    }

    pub fn required(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            ty: ParamType::Float { min, max },
            default: None,
        }
    }

    pub fn mode(name: &'static str, variants: Vec<&'static str>, default: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Mode { variants },
            default: Some(ParamValue::Mode(default.to_string())),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Check a value against this parameter's type and range
    pub fn check(&self, kind: EffectKind, value: &ParamValue) -> Result<()> {
        let invalid = |expected: String| FxError::InvalidParameterValue {
            effect: kind.to_string(),
            param: self.name.to_string(),
            expected,
            value: value.to_string(),
        };

        match (&self.ty, value) {
            (ParamType::Float { min, max }, ParamValue::Int(_) | ParamValue::Float(_)) => {
                let v = value.as_f64().unwrap_or(f64::NAN);
                if !v.is_finite() {
                    return Err(invalid("a finite number".to_string()));
                }
                if v < *min || v > *max {
                    return Err(FxError::ParameterOutOfRange {
                        effect: kind.to_string(),
                        param: self.name.to_string(),
                        value: v,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(())
            }
            (ParamType::Float { .. }, ParamValue::Mode(_)) => Err(invalid("a number".to_string())),
            (ParamType::Mode { variants }, ParamValue::Mode(m)) => {
                if variants.contains(&m.as_str()) {
                    Ok(())
                } else {
                    Err(invalid(format!("one of {}", variants.join(", "))))
                }
            }
            (ParamType::Mode { variants }, _) => {
                Err(invalid(format!("one of {}", variants.join(", "))))
            }
        }
    }
}

/// Ordered parameter schema of one effect kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    pub kind: EffectKind,
    pub params: Vec<ParamSpec>,
}

impl ParameterSchema {
    pub fn new(kind: EffectKind, params: Vec<ParamSpec>) -> Self {
        Self { kind, params }
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameter names in schema order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|p| p.name)
    }

    /// Validate explicit values and resolve the full parameter set
    ///
    /// Checks, in order: unknown names, duplicates, type and range of each
    /// value, required parameters. The result lists every parameter in
    /// schema order with defaults filled in.
    pub fn resolve(&self, explicit: &[(String, ParamValue)]) -> Result<Vec<(&'static str, ParamValue)>> {
        let effect = || self.kind.to_string();

        if let Some((name, _)) = explicit.iter().find(|(name, _)| self.get(name).is_none()) {
            return Err(FxError::UnknownParameter {
                effect: effect(),
                param: name.clone(),
            });
        }

        for (i, (name, _)) in explicit.iter().enumerate() {
            if explicit[..i].iter().any(|(earlier, _)| earlier == name) {
                return Err(FxError::DuplicateParameter {
                    effect: effect(),
                    param: name.clone(),
                });
            }
        }

        for (name, value) in explicit {
            if let Some(spec) = self.get(name) {
                spec.check(self.kind, value)?;
            }
        }

        self.params
            .iter()
            .map(|spec| {
                let value = explicit
                    .iter()
                    .find(|(name, _)| name == spec.name)
                    .map(|(_, v)| v.clone())
                    .or_else(|| spec.default.clone())
                    .ok_or_else(|| FxError::MissingParameter {
                        effect: effect(),
                        param: spec.name.to_string(),
                    })?;
                Ok((spec.name, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay_schema() -> ParameterSchema {
        ParameterSchema::new(
            EffectKind::Delay,
            vec![
                ParamSpec::required("delay_seconds", 0.0, 10.0),
                ParamSpec::float("mix", 0.0, 1.0, ParamValue::Float(0.5)),
            ],
        )
    }

    fn params(list: &[(&str, ParamValue)]) -> Vec<(String, ParamValue)> {
        list.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_resolve_fills_defaults_in_schema_order() {
        let resolved = delay_schema()
            .resolve(&params(&[("delay_seconds", ParamValue::Float(0.3))]))
            .unwrap();
        assert_eq!(
            resolved,
            vec![
                ("delay_seconds", ParamValue::Float(0.3)),
                ("mix", ParamValue::Float(0.5)),
            ]
        );
    }

    #[test]
    fn test_missing_required() {
        let err = delay_schema().resolve(&[]).unwrap_err();
        assert!(matches!(err, FxError::MissingParameter { .. }));
        assert_eq!(err.param(), Some("delay_seconds"));
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let err = delay_schema()
            .resolve(&params(&[("delay_seconds", ParamValue::Int(11))]))
            .unwrap_err();
        assert!(matches!(err, FxError::ParameterOutOfRange { .. }));
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = delay_schema()
            .resolve(&params(&[
                ("delay_seconds", ParamValue::Int(1)),
                ("delay_seconds", ParamValue::Int(2)),
            ]))
            .unwrap_err();
        assert!(matches!(err, FxError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_mode_rejected_for_number() {
        let err = delay_schema()
            .resolve(&params(&[("delay_seconds", ParamValue::from("HPF12"))]))
            .unwrap_err();
        assert!(matches!(err, FxError::InvalidParameterValue { .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = delay_schema()
            .resolve(&params(&[("delay_seconds", ParamValue::Float(f64::NAN))]))
            .unwrap_err();
        assert_eq!(err.param(), Some("delay_seconds"));
    }
}
