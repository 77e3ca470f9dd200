//! Cashflow error types.

use thiserror::Error;
use uuid::Uuid;

use ledgerly_shared::AppError;

/// Errors that can occur during ledger entry operations.
#[derive(Debug, Error)]
pub enum CashflowError {
    /// Entry magnitude cannot be negative; sign is implied by category.
    #[error("Entry amount cannot be negative")]
    NegativeAmount,

    /// Wallet not found.
    #[error("Wallet not found: {0}")]
    WalletNotFound(Uuid),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Ledger entry not found.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(Uuid),

    /// A required built-in category (e.g. "Sales") is missing.
    #[error("Built-in category {0:?} is not seeded for this company")]
    MissingBuiltinCategory(&'static str),

    /// Mirrored entries are managed by their source records.
    #[error("Entry {0} mirrors an order item or refund and cannot be edited directly")]
    MirroredEntryImmutable(Uuid),

    /// Referenced entity belongs to another company.
    #[error("{entity} {id} belongs to another company")]
    CompanyMismatch {
        /// Entity kind (e.g. "Wallet").
        entity: &'static str,
        /// The foreign entity's id.
        id: Uuid,
    },
}

impl CashflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::WalletNotFound(_) => "WALLET_NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::MissingBuiltinCategory(_) => "MISSING_BUILTIN_CATEGORY",
            Self::MirroredEntryImmutable(_) => "MIRRORED_ENTRY_IMMUTABLE",
            Self::CompanyMismatch { .. } => "COMPANY_MISMATCH",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeAmount | Self::MirroredEntryImmutable(_) => 400,
            Self::WalletNotFound(_)
            | Self::CategoryNotFound(_)
            | Self::EntryNotFound(_)
            | Self::MissingBuiltinCategory(_) => 404,
            Self::CompanyMismatch { .. } => 403,
        }
    }
}

impl From<CashflowError> for AppError {
    fn from(err: CashflowError) -> Self {
        match err.http_status_code() {
            403 => Self::Forbidden(err.to_string()),
            404 => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CashflowError::NegativeAmount.error_code(), "NEGATIVE_AMOUNT");
        assert_eq!(
            CashflowError::WalletNotFound(Uuid::nil()).error_code(),
            "WALLET_NOT_FOUND"
        );
        assert_eq!(
            CashflowError::CompanyMismatch {
                entity: "Wallet",
                id: Uuid::nil(),
            }
            .error_code(),
            "COMPANY_MISMATCH"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CashflowError::NegativeAmount.http_status_code(), 400);
        assert_eq!(
            CashflowError::CategoryNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            CashflowError::CompanyMismatch {
                entity: "Category",
                id: Uuid::nil(),
            }
            .http_status_code(),
            403
        );
    }
}
