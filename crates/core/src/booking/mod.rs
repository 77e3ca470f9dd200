//! Booking status propagation.
//!
//! A booking's status is derived, never authoritative on its own: after
//! every booking-item change the parent booking takes the "weakest"
//! status among its items. Persistence lives in the database layer.

pub mod service;
pub mod types;

pub use service::BookingService;
pub use types::BookingStatus;
