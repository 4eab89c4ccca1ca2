//! Policy for features the backend cannot honor.

use std::fmt::Debug;

use crate::error::ValidationError;

/// Check a value given for a feature the backend does not implement.
///
/// - `None`: nothing was requested, nothing happens.
/// - The safe default: logged as a warning and ignored.
/// - Anything else: [`ValidationError::Unsupported`].
pub fn check_unsupported<T: PartialEq + Debug>(
    feature: &str,
    given: Option<&T>,
    safe_default: &T,
) -> Result<(), ValidationError> {
    match given {
        None => Ok(()),
        Some(value) if value == safe_default => {
            tracing::warn!(feature, value = ?value, "unsupported feature ignored");
            Ok(())
        }
        Some(value) => Err(ValidationError::Unsupported {
            feature: feature.to_string(),
            requested: format!("{value:?}"),
            safe_default: format!("{safe_default:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_accepted() {
        assert!(check_unsupported::<f64>("chirp", None, &0.0).is_ok());
    }

    #[test]
    fn safe_default_is_accepted() {
        assert!(check_unsupported("chirp", Some(&0.0), &0.0).is_ok());
    }

    #[test]
    fn other_value_is_rejected() {
        match check_unsupported("chirp", Some(&1.5), &0.0) {
            Err(ValidationError::Unsupported {
                feature,
                requested,
                safe_default,
            }) => {
                assert_eq!(feature, "chirp");
                assert_eq!(requested, "1.5");
                assert_eq!(safe_default, "0.0");
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }
}
