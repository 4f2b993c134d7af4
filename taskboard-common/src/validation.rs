//! Input validation shared by the user, group and task endpoints. The
//! character classes mirror the legacy schema's check constraints.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::consts::{
    MAX_EMAIL_LEN, MAX_FULL_NAME_LEN, MAX_GROUP_NAME_LEN, MAX_JOB_LEN, MAX_TASK_TITLE_LEN,
};
use crate::TaskboardError;

#[allow(clippy::unwrap_used)]
static FULL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z ]+$").unwrap());
#[allow(clippy::unwrap_used)]
static JOB_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_-]+$").unwrap());
#[allow(clippy::unwrap_used)]
static GROUP_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9 ]+$").unwrap());
#[allow(clippy::unwrap_used)]
static TASK_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z@\-_ ]+$").unwrap());
#[allow(clippy::unwrap_used)]
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0[56][0-9]{8}$").unwrap());

pub fn validate_full_name(value: &str) -> Result<(), TaskboardError> {
    if value.len() > MAX_FULL_NAME_LEN {
        return Err(TaskboardError::validation(
            "Name must be 30 characters or less.",
        ));
    }
    if !FULL_NAME.is_match(value) {
        return Err(TaskboardError::validation(
            "Name must contain only letters and spaces.",
        ));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), TaskboardError> {
    if value.is_empty() || value.len() > MAX_EMAIL_LEN {
        return Err(TaskboardError::validation(
            "Email must be 40 characters or less.",
        ));
    }
    Ok(())
}

/// Upper-cases a job title and collapses whitespace runs into underscores,
/// the normal form the schema expects.
pub fn normalize_job(value: &str) -> String {
    #[allow(clippy::unwrap_used)]
    static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    SPACES.replace_all(&value.to_uppercase(), "_").into_owned()
}

pub fn validate_job(normalized: &str) -> Result<(), TaskboardError> {
    if normalized.len() > MAX_JOB_LEN {
        return Err(TaskboardError::validation(
            "Job title too long (max 20 chars).",
        ));
    }
    if !JOB_TITLE.is_match(normalized) {
        return Err(TaskboardError::validation(
            "Job title contains invalid characters (only A-Z, _, - allowed).",
        ));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), TaskboardError> {
    if !PHONE.is_match(value) {
        return Err(TaskboardError::validation(
            "Phone must be 10 digits starting with 05 or 06.",
        ));
    }
    Ok(())
}

pub fn validate_group_name(value: &str) -> Result<(), TaskboardError> {
    if value.is_empty() || value.len() > MAX_GROUP_NAME_LEN || !GROUP_NAME.is_match(value) {
        return Err(TaskboardError::Validation(format!(
            "Invalid group name: \"{value}\""
        )));
    }
    Ok(())
}

pub fn validate_task_title(value: &str) -> Result<(), TaskboardError> {
    if value.len() > MAX_TASK_TITLE_LEN || !TASK_TEXT.is_match(value) {
        return Err(TaskboardError::validation(
            "Title contains invalid characters.",
        ));
    }
    Ok(())
}

pub fn validate_task_description(value: &str) -> Result<(), TaskboardError> {
    if !TASK_TEXT.is_match(value) {
        return Err(TaskboardError::validation(
            "Description contains invalid characters.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_rules() {
        assert!(validate_full_name("Ada Lovelace").is_ok());
        assert!(validate_full_name("Ada_Lovelace").is_err());
        assert!(validate_full_name("Ada1").is_err());
        assert!(validate_full_name(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_job_normalization() {
        assert_eq!(normalize_job("sys admin"), "SYS_ADMIN");
        assert!(validate_job("SYS_ADMIN").is_ok());
        assert!(validate_job("SYS ADMIN").is_err());
    }

    #[test]
    fn test_task_text_character_class() {
        assert!(validate_task_title("Fix login @backend_api-v").is_ok());
        assert!(validate_task_title("Fix login!").is_err());
        assert!(validate_task_description("rewrite the auth flow").is_ok());
        assert!(validate_task_description("100% done").is_err());
    }

    #[test]
    fn test_group_name_rules() {
        assert!(validate_group_name("Alpha Team").is_ok());
        assert!(validate_group_name("Team 42").is_ok());
        assert!(validate_group_name("Team#1").is_err());
        assert!(validate_group_name("").is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("0512345678").is_ok());
        assert!(validate_phone("0612345678").is_ok());
        assert!(validate_phone("0712345678").is_err());
        assert!(validate_phone("05123").is_err());
    }
}
