//! Decides how many days of a leave request come out of each balance.
//!
//! Paid days are always used first. Once they run out, the rest of the
//! request is taken from the non-paid balance.

use serde::Serialize;

use crate::{Error, ledger::Balances};

/// A validated, positive number of leave days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DayCount(i64);

impl DayCount {
    /// Create a day count.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDayCount] if `days` is zero or negative.
    pub fn new(days: i64) -> Result<Self, Error> {
        if days > 0 {
            Ok(Self(days))
        } else {
            Err(Error::InvalidDayCount(days))
        }
    }

    /// The number of days.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for DayCount {
    type Error = Error;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        DayCount::new(days)
    }
}

/// The number of days to deduct from each balance for one leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Days taken from the paid balance.
    pub paid: i64,
    /// Days taken from the non-paid balance.
    pub non_paid: i64,
}

impl Allocation {
    /// The total number of days deducted, which always equals the number of
    /// days requested.
    pub fn total(&self) -> i64 {
        self.paid + self.non_paid
    }
}

/// A leave request that the person's balances cannot cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "insufficient leave: need {requested} days, have {available_paid} paid + \
    {available_non_paid} non-paid"
)]
pub struct InsufficientBalance {
    /// The number of days requested.
    pub requested: i64,
    /// The paid days that could be used, never less than zero.
    pub available_paid: i64,
    /// The non-paid days that could be used, never less than zero.
    pub available_non_paid: i64,
}

/// Split `requested` days between the paid and non-paid balances.
///
/// A negative paid balance counts as zero available paid days. The request is
/// rejected only when the non-paid balance is smaller than the days left over
/// after using every available paid day.
///
/// # Errors
///
/// Returns [InsufficientBalance] when the balances cannot cover the request.
pub fn allocate(balances: Balances, requested: DayCount) -> Result<Allocation, InsufficientBalance> {
    let requested = requested.get();
    let available_paid = balances.paid.max(0);

    let allocation = if available_paid >= requested {
        Allocation {
            paid: requested,
            non_paid: 0,
        }
    } else {
        Allocation {
            paid: available_paid,
            non_paid: requested - available_paid,
        }
    };

    if balances.non_paid < allocation.non_paid {
        return Err(InsufficientBalance {
            requested,
            available_paid,
            available_non_paid: balances.non_paid.max(0),
        });
    }

    Ok(allocation)
}

#[cfg(test)]
mod day_count_tests {
    use crate::{Error, ledger::DayCount};

    #[test]
    fn new_fails_on_zero() {
        assert_eq!(DayCount::new(0), Err(Error::InvalidDayCount(0)));
    }

    #[test]
    fn new_fails_on_negative_days() {
        assert_eq!(DayCount::new(-3), Err(Error::InvalidDayCount(-3)));
    }

    #[test]
    fn new_succeeds_on_positive_days() {
        let days = DayCount::new(5).expect("Could not create day count");

        assert_eq!(days.get(), 5);
    }
}
