// Project name validation.
use crate::error::{CoreError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Pattern every project name must match: lowercase alphanumerics with
/// internal hyphens.
pub const PROJECT_NAME_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

/// Upper bound on object names in the resource store.
pub const MAX_NAME_LENGTH: usize = 253;

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PROJECT_NAME_PATTERN).expect("project name pattern is valid"));

pub fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CoreError::invalid_project_name(name, "must not be empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(CoreError::invalid_project_name(
            name,
            format!("must be at most {MAX_NAME_LENGTH} characters"),
        ));
    }
    if !PROJECT_NAME_RE.is_match(name) {
        return Err(CoreError::invalid_project_name(
            name,
            format!("must match {PROJECT_NAME_PATTERN}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["team-a", "a", "0", "payments-v2", "a1-b2-c3"] {
            assert!(validate_project_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "Team-A", "-team", "team-", "team_a", "team.a", "team a"] {
            let err = validate_project_name(name).unwrap_err();
            assert!(err.is_invalid_input(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_name_length_limit() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_project_name(&long).is_err());
        assert!(validate_project_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }
}
