//! Explicit request validation — validator functions over DTOs, returning
//! structured field-level violations evaluated before handler dispatch.

use serde::{Deserialize, Serialize};

const MIN_PASSWORD_LEN: usize = 8;

/// One field-level validation failure.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Body of `POST /api/auth/password-reset/confirm`. All fields optional at
/// the wire level so validation can report every problem at once.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordResetConfirm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Minimal address shape check: one `@` with non-empty local and domain
/// parts, lowercased and trimmed.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn validate_password_reset(request: &PasswordResetConfirm) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    match request.password.as_deref().map(str::trim) {
        None | Some("") => violations.push(FieldViolation {
            field: "password",
            message: "password is required".to_owned(),
        }),
        Some(password) if password.chars().count() < MIN_PASSWORD_LEN => violations.push(FieldViolation {
            field: "password",
            message: format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        }),
        Some(_) => {}
    }

    if let Some(email) = request.email.as_deref() {
        if normalize_email(email).is_none() {
            violations.push(FieldViolation {
                field: "email",
                message: "email is not a valid address".to_owned(),
            });
        }
    }

    if request.token.as_deref().is_some_and(|t| t.trim().is_empty()) {
        violations.push(FieldViolation { field: "token", message: "token must not be blank".to_owned() });
    }

    violations
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
