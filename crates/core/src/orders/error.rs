//! Order error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use ledgerly_shared::AppError;

/// Errors that can occur during order and refund operations.
#[derive(Debug, Error)]
pub enum OrderError {
    // ========== Validation Errors ==========
    /// Item quantity must be positive.
    #[error("Item quantity must be positive")]
    ZeroQuantity,

    /// Item quantity exceeds what the storage column can hold.
    #[error("Quantity {0} is too large")]
    QuantityTooLarge(u32),

    /// Discount cannot be negative.
    #[error("Discount cannot be negative")]
    NegativeDiscount,

    /// Discount cannot exceed the unit price.
    #[error("Discount {discount} exceeds unit price {price}")]
    DiscountExceedsPrice {
        /// The offending per-unit discount.
        discount: Decimal,
        /// The unit price.
        price: Decimal,
    },

    /// A paid item must reference a wallet for its sales entry.
    #[error("A wallet is required to mark an item as paid")]
    PaidWithoutWallet,

    /// Product has no usable price and none was supplied.
    #[error("Product {0} has no price and none was supplied")]
    NoPrice(Uuid),

    // ========== Refund Errors ==========
    /// Refunds apply to paid items only.
    #[error("Only paid items can be refunded")]
    RefundOnUnpaidItem,

    /// Refund quantity must be positive.
    #[error("Refund quantity must be positive")]
    ZeroRefundQuantity,

    /// Refund amount must be positive.
    #[error("Refund amount must be positive")]
    NonPositiveRefundAmount,

    /// Cumulative refunds cannot exceed the purchased quantity.
    #[error(
        "Refund quantity {requested} exceeds remaining quantity {remaining} \
         (purchased {purchased}, already refunded {already_refunded})"
    )]
    RefundExceedsQuantity {
        /// Units requested in this refund.
        requested: u32,
        /// Units still refundable.
        remaining: u32,
        /// Units originally purchased.
        purchased: u32,
        /// Units refunded by earlier refunds.
        already_refunded: u32,
    },

    // ========== Not-found Errors ==========
    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    /// Order item not found.
    #[error("Order item not found: {0}")]
    ItemNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Wallet not found.
    #[error("Wallet not found: {0}")]
    WalletNotFound(Uuid),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    // ========== Tenant Errors ==========
    /// Referenced entity belongs to another company.
    #[error("{entity} {id} belongs to another company")]
    CompanyMismatch {
        /// Entity kind (e.g. "Wallet").
        entity: &'static str,
        /// The foreign entity's id.
        id: Uuid,
    },
}

impl OrderError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::QuantityTooLarge(_) => "QUANTITY_TOO_LARGE",
            Self::NegativeDiscount => "NEGATIVE_DISCOUNT",
            Self::DiscountExceedsPrice { .. } => "DISCOUNT_EXCEEDS_PRICE",
            Self::PaidWithoutWallet => "PAID_WITHOUT_WALLET",
            Self::NoPrice(_) => "NO_PRICE",
            Self::RefundOnUnpaidItem => "REFUND_ON_UNPAID_ITEM",
            Self::ZeroRefundQuantity => "ZERO_REFUND_QUANTITY",
            Self::NonPositiveRefundAmount => "NON_POSITIVE_REFUND_AMOUNT",
            Self::RefundExceedsQuantity { .. } => "REFUND_EXCEEDS_QUANTITY",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::WalletNotFound(_) => "WALLET_NOT_FOUND",
            Self::ClientNotFound(_) => "CLIENT_NOT_FOUND",
            Self::CompanyMismatch { .. } => "COMPANY_MISMATCH",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::ZeroQuantity
            | Self::QuantityTooLarge(_)
            | Self::NegativeDiscount
            | Self::DiscountExceedsPrice { .. }
            | Self::PaidWithoutWallet
            | Self::NoPrice(_)
            | Self::RefundOnUnpaidItem
            | Self::ZeroRefundQuantity
            | Self::NonPositiveRefundAmount
            | Self::RefundExceedsQuantity { .. } => 400,

            // 403 Forbidden - cross-tenant references
            Self::CompanyMismatch { .. } => 403,

            // 404 Not Found
            Self::OrderNotFound(_)
            | Self::ItemNotFound(_)
            | Self::ProductNotFound(_)
            | Self::WalletNotFound(_)
            | Self::ClientNotFound(_) => 404,
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err.http_status_code() {
            403 => Self::Forbidden(err.to_string()),
            404 => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
