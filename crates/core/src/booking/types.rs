//! Booking domain types.

use serde::{Deserialize, Serialize};

/// Status of a booking or booking item.
///
/// Items may be set to any status directly; there is no transition
/// guard. The parent booking derives its own status as the minimum-rank
/// status among its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Not yet confirmed.
    Pending,
    /// Confirmed but not finished.
    Confirmed,
    /// Finished.
    Completed,
    /// Cancelled.
    Cancelled,
}

impl BookingStatus {
    /// Total order used for "weakest status wins" derivation:
    /// pending(0) < confirmed(1) < completed(2) < cancelled(3).
    ///
    /// Cancelled ranks highest purely to keep the order total; rank does
    /// not imply desirability.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Confirmed => 1,
            Self::Completed => 2,
            Self::Cancelled => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_strictly_increasing() {
        assert!(BookingStatus::Pending.rank() < BookingStatus::Confirmed.rank());
        assert!(BookingStatus::Confirmed.rank() < BookingStatus::Completed.rank());
        assert!(BookingStatus::Completed.rank() < BookingStatus::Cancelled.rank());
    }
}
