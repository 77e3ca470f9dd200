//! Booking business logic.

use chrono::{DateTime, Utc};

use super::types::BookingStatus;

/// Stateless booking derivation logic.
pub struct BookingService;

impl BookingService {
    /// Derives the parent booking's status from its item statuses.
    ///
    /// Returns the item status with the minimum rank ("weakest" status:
    /// a booking is only as done as its least-advanced item). Returns
    /// `None` for a booking with zero items, in which case the stored
    /// status is left unchanged.
    #[must_use]
    pub fn derive_status(items: &[BookingStatus]) -> Option<BookingStatus> {
        items.iter().copied().min_by_key(|s| s.rank())
    }

    /// Resolves a booking item's effective time window.
    ///
    /// An item may carry its own start/end; missing ends fall back to
    /// the parent booking's window.
    #[must_use]
    pub fn effective_window(
        item_start: Option<DateTime<Utc>>,
        item_end: Option<DateTime<Utc>>,
        booking_start: Option<DateTime<Utc>>,
        booking_end: Option<DateTime<Utc>>,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (item_start.or(booking_start), item_end.or(booking_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(&[BookingStatus::Completed, BookingStatus::Confirmed, BookingStatus::Pending], BookingStatus::Pending)]
    #[case(&[BookingStatus::Completed, BookingStatus::Confirmed], BookingStatus::Confirmed)]
    #[case(&[BookingStatus::Completed, BookingStatus::Completed], BookingStatus::Completed)]
    #[case(&[BookingStatus::Cancelled, BookingStatus::Completed], BookingStatus::Completed)]
    #[case(&[BookingStatus::Cancelled], BookingStatus::Cancelled)]
    fn test_weakest_status_wins(#[case] items: &[BookingStatus], #[case] expected: BookingStatus) {
        assert_eq!(BookingService::derive_status(items), Some(expected));
    }

    #[test]
    fn test_zero_items_leaves_status_unchanged() {
        assert_eq!(BookingService::derive_status(&[]), None);
    }

    #[test]
    fn test_derivation_idempotent() {
        let items = [BookingStatus::Confirmed, BookingStatus::Completed];
        assert_eq!(
            BookingService::derive_status(&items),
            BookingService::derive_status(&items)
        );
    }

    #[test]
    fn test_effective_window_falls_back_to_booking() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let own_start = Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).unwrap();

        // No own window: inherit both ends.
        assert_eq!(
            BookingService::effective_window(None, None, Some(start), Some(end)),
            (Some(start), Some(end))
        );
        // Own start, inherited end.
        assert_eq!(
            BookingService::effective_window(Some(own_start), None, Some(start), Some(end)),
            (Some(own_start), Some(end))
        );
    }
}
