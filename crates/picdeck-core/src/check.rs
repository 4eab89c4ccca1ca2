//! Reusable construction-time checks.
//!
//! Every helper returns the checked value on success so constructors can
//! validate and bind in one expression.

use crate::error::ValidationError;

/// Tolerance for unit-vector checks.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// `value` must be finite.
pub fn finite(parameter: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::out_of_range(parameter, value, "a finite number"))
    }
}

/// `value` must be finite and strictly positive.
pub fn positive(parameter: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::out_of_range(parameter, value, "finite and > 0"))
    }
}

/// `value` must be finite and not negative.
pub fn non_negative(parameter: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::out_of_range(parameter, value, "finite and >= 0"))
    }
}

/// `vector` must be finite with unit Euclidean length.
pub fn normalized(parameter: &str, vector: [f64; 3]) -> Result<[f64; 3], ValidationError> {
    if vector.iter().any(|c| !c.is_finite()) {
        return Err(ValidationError::invalid(parameter, "components must be finite"));
    }
    let norm_sq: f64 = vector.iter().map(|c| c * c).sum();
    if (norm_sq - 1.0).abs() > NORMALIZATION_TOLERANCE {
        return Err(ValidationError::invalid(
            parameter,
            format!("must be normalized, |v|^2 = {norm_sq}"),
        ));
    }
    Ok(vector)
}

/// `name` must be a C-style identifier: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Names end up as identifiers in generated code.
pub fn identifier<'a>(parameter: &str, name: &'a str) -> Result<&'a str, ValidationError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(ValidationError::invalid(
            parameter,
            format!("'{name}' is not a valid identifier"),
        ))
    }
}

/// Dot product of two 3-vectors.
pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_rejects_zero_nan_inf() {
        assert!(positive("x", 0.0).is_err());
        assert!(positive("x", f64::NAN).is_err());
        assert!(positive("x", f64::INFINITY).is_err());
        assert_eq!(positive("x", 2.5), Ok(2.5));
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative("x", 0.0), Ok(0.0));
        assert!(non_negative("x", -1e-300).is_err());
    }

    #[test]
    fn normalized_checks_length() {
        assert!(normalized("d", [1.0, 0.0, 0.0]).is_ok());
        assert!(normalized("d", [1.0, 1.0, 0.0]).is_err());
        assert!(normalized("d", [f64::NAN, 0.0, 0.0]).is_err());
    }

    #[test]
    fn identifier_rules() {
        assert!(identifier("name", "electron").is_ok());
        assert!(identifier("name", "_H2").is_ok());
        assert!(identifier("name", "").is_err());
        assert!(identifier("name", "2e").is_err());
        assert!(identifier("name", "e-").is_err());
    }

    proptest! {
        #[test]
        fn scaled_unit_vectors_pass(x in -1.0f64..1.0, y in -1.0f64..1.0, z in 0.1f64..1.0) {
            let n = (x * x + y * y + z * z).sqrt();
            prop_assert!(normalized("d", [x / n, y / n, z / n]).is_ok());
        }
    }
}
