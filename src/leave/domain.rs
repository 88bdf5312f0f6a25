//! Core leave record types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::DatabaseId,
    ledger::{Allocation, DayCount, LeaveRequest},
    person::PersonId,
};

/// Database identifier for a leave record.
pub type LeaveId = DatabaseId;

/// A granted period of leave.
///
/// Leave records are only created by [crate::ledger::grant_leave], so `days`
/// always equals `paid_days + non_paid_days`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveRecord {
    pub id: LeaveId,
    pub label: String,
    /// The first day of leave. Stored as entered, usually `YYYY-MM-DD`.
    pub from_date: String,
    /// The last day of leave. Stored as entered, usually `YYYY-MM-DD`.
    pub to_date: String,
    pub person_id: PersonId,
    /// The number of days deducted when the leave was granted.
    pub days: i64,
    pub paid_days: i64,
    pub non_paid_days: i64,
    /// The idempotency key supplied with the original request, if any.
    pub request_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl LeaveRecord {
    /// How the granted days were split between the balances.
    pub fn allocation(&self) -> Allocation {
        Allocation {
            paid: self.paid_days,
            non_paid: self.non_paid_days,
        }
    }
}

/// The fields needed to insert a leave record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRecord<'a> {
    pub label: &'a str,
    pub from_date: &'a str,
    pub to_date: &'a str,
    pub person_id: PersonId,
    pub allocation: Allocation,
    pub request_id: Option<&'a str>,
}

/// The parts of a leave record that may be edited after it has been granted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaveDetailsForm {
    pub label: String,
    pub from_date: String,
    pub to_date: String,
}

impl From<&LeaveRecord> for LeaveDetailsForm {
    fn from(record: &LeaveRecord) -> Self {
        Self {
            label: record.label.clone(),
            from_date: record.from_date.clone(),
            to_date: record.to_date.clone(),
        }
    }
}

/// Form data for requesting leave.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaveForm {
    pub person_id: PersonId,
    pub label: String,
    pub from_date: String,
    pub to_date: String,
    pub days: i64,
    /// A fresh key rendered into each form so that resubmitting it does not
    /// grant the same leave twice.
    #[serde(default)]
    pub request_id: Option<String>,
}

impl LeaveForm {
    /// Convert the form into a leave request.
    ///
    /// A blank request ID is treated as no request ID.
    ///
    /// # Errors
    ///
    /// Returns [crate::Error::InvalidDayCount] if `days` is not positive.
    pub fn into_request(self) -> Result<LeaveRequest, Error> {
        let days = DayCount::new(self.days)?;
        let request_id = self
            .request_id
            .map(|request_id| request_id.trim().to_owned())
            .filter(|request_id| !request_id.is_empty());

        Ok(LeaveRequest {
            person_id: self.person_id,
            label: self.label,
            from_date: self.from_date,
            to_date: self.to_date,
            days,
            request_id,
        })
    }
}

#[cfg(test)]
mod leave_form_tests {
    use crate::{Error, leave::LeaveForm};

    fn form(days: i64, request_id: Option<&str>) -> LeaveForm {
        LeaveForm {
            person_id: 1,
            label: "Holiday".to_owned(),
            from_date: "2024-01-01".to_owned(),
            to_date: "2024-01-05".to_owned(),
            days,
            request_id: request_id.map(str::to_owned),
        }
    }

    #[test]
    fn rejects_zero_days() {
        assert_eq!(form(0, None).into_request(), Err(Error::InvalidDayCount(0)));
    }

    #[test]
    fn blank_request_id_becomes_none() {
        let request = form(3, Some("  ")).into_request().unwrap();

        assert_eq!(request.request_id, None);
        assert_eq!(request.days.get(), 3);
    }

    #[test]
    fn keeps_request_id() {
        let request = form(3, Some("abc")).into_request().unwrap();

        assert_eq!(request.request_id.as_deref(), Some("abc"));
    }
}
