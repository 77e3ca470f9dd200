//! Company (tenant) validation rules.
//!
//! Tenant resolution (mapping a request to a company) is an external
//! concern; this module only owns the validation of company fields.

use thiserror::Error;

use ledgerly_shared::AppError;

/// Errors raised while validating company fields.
#[derive(Debug, Error)]
pub enum CompanyError {
    /// Subdomain contains characters outside `[a-z0-9-]`.
    #[error(
        "Invalid subdomain {0:?}: only lowercase letters, numbers, and hyphens are allowed"
    )]
    InvalidSubdomain(String),

    /// Subdomain is empty after normalization.
    #[error("Subdomain cannot be empty")]
    EmptySubdomain,
}

impl From<CompanyError> for AppError {
    fn from(err: CompanyError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Normalizes and validates a subdomain.
///
/// Lowercases and trims the input, then requires it to consist solely
/// of lowercase letters, digits, and hyphens.
///
/// # Errors
///
/// Returns `CompanyError` if the normalized subdomain is empty or
/// contains other characters.
pub fn normalize_subdomain(raw: &str) -> Result<String, CompanyError> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(CompanyError::EmptySubdomain);
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CompanyError::InvalidSubdomain(raw.to_string()));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_subdomains() {
        assert_eq!(normalize_subdomain("acme").unwrap(), "acme");
        assert_eq!(normalize_subdomain("acme-2").unwrap(), "acme-2");
        assert_eq!(normalize_subdomain("  ACME  ").unwrap(), "acme");
    }

    #[test]
    fn test_invalid_subdomains() {
        assert!(matches!(
            normalize_subdomain("acme.shop"),
            Err(CompanyError::InvalidSubdomain(_))
        ));
        assert!(matches!(
            normalize_subdomain("acme shop"),
            Err(CompanyError::InvalidSubdomain(_))
        ));
        assert!(matches!(
            normalize_subdomain("   "),
            Err(CompanyError::EmptySubdomain)
        ));
    }
}
