//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Mutations that touch derived state (order totals,
//! booking statuses, mirrored ledger entries) run inside one database
//! transaction per entry point.

pub mod booking;
pub mod cashflow;
pub mod catalog;
pub mod company;
pub mod ledger;
pub mod order;
pub mod wallet;

pub use booking::{
    BookingError, BookingItemSpec, BookingRepository, BookingWithItems, CreateBookingInput,
};
pub use cashflow::CashflowRepository;
pub use catalog::CatalogRepository;
pub use company::{CompanyRepoError, CompanyRepository, CreateCompanyInput};
pub use ledger::{
    CreateEntryInput, LedgerError, LedgerRepository, REFUNDS_CATEGORY, SALES_CATEGORY,
};
pub use order::{OrderRepoError, OrderRepository, OrderWithItems};
pub use wallet::{WalletBalance, WalletRepository};
