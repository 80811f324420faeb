//! Validation of individual lookup terms.

use crate::{Result, TpmStoreError};

/// Minimum number of lookup terms: url, user, password and one `key=value`.
pub const MIN_TERMS: usize = 4;

/// Checks that enough terms were supplied.
///
/// # Errors
///
/// Returns [`TpmStoreError::Validation`] with the caller-facing message when
/// fewer than [`MIN_TERMS`] terms are present.
pub fn validate_term_count(terms: &[String]) -> Result<()> {
    if terms.len() < MIN_TERMS {
        return Err(TpmStoreError::Validation(
            "At least 4 arguments required.".to_string(),
        ));
    }
    Ok(())
}

/// Splits a term on its first `=`.
///
/// Returns `None` for terms without `=`; those are ignored by the parser.
///
/// ```
/// use tpmstore::validation::split_term;
///
/// assert_eq!(split_term("notes=a=b"), Some(("notes", "a=b")));
/// assert_eq!(split_term("name="), Some(("name", "")));
/// assert_eq!(split_term("positional"), None);
/// ```
pub fn split_term(term: &str) -> Option<(&str, &str)> {
    term.split_once('=')
}

/// Parses the value of a `create=` term.
///
/// Only the literals `True` and `False` are accepted.
///
/// # Errors
///
/// Returns [`TpmStoreError::Validation`] naming the rejected value.
pub fn parse_create_flag(value: &str) -> Result<bool> {
    match value {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(TpmStoreError::Validation(format!(
            "create can only be True or False and not: {}",
            other
        ))),
    }
}

/// Checks that a lookup has something to search for.
///
/// # Errors
///
/// Returns [`TpmStoreError::Validation`] when neither `name` nor `search`
/// was supplied.
pub fn require_target(name: Option<&str>, search: Option<&str>) -> Result<()> {
    if name.is_none() && search.is_none() {
        return Err(missing_target());
    }
    Ok(())
}

pub(crate) fn missing_target() -> TpmStoreError {
    TpmStoreError::Validation("Either \"name\" or \"search\" have to be set.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{}", i)).collect()
    }

    #[test]
    fn test_term_count() {
        for n in 0..MIN_TERMS {
            let err = validate_term_count(&terms(n)).unwrap_err();
            assert_eq!(err.to_string(), "At least 4 arguments required.");
        }
        assert!(validate_term_count(&terms(4)).is_ok());
        assert!(validate_term_count(&terms(9)).is_ok());
    }

    #[test]
    fn test_split_on_first_equals() {
        assert_eq!(split_term("key=value"), Some(("key", "value")));
        assert_eq!(split_term("=value"), Some(("", "value")));
        assert_eq!(
            split_term("access_info=ssh://root@host?x=1"),
            Some(("access_info", "ssh://root@host?x=1"))
        );
    }

    #[test]
    fn test_create_flag() {
        assert!(parse_create_flag("True").unwrap());
        assert!(!parse_create_flag("False").unwrap());

        for bad in ["true", "false", "yes", "1", "", "Foo"] {
            let err = parse_create_flag(bad).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("create can only be True or False and not: {}", bad)
            );
        }
    }

    #[test]
    fn test_require_target() {
        assert!(require_target(Some("db"), None).is_ok());
        assert!(require_target(None, Some("tag:ssh")).is_ok());
        assert!(require_target(Some("db"), Some("tag:ssh")).is_ok());

        let err = require_target(None, None).unwrap_err();
        assert_eq!(err.to_string(), "Either \"name\" or \"search\" have to be set.");
    }
}
