//! Grants leave by reading balances, allocating days, writing the new balances
//! and inserting the leave record as a single SQLite transaction.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;

use crate::{
    Error,
    leave::{LeaveId, NewLeaveRecord, get_leave_by_request_id, insert_leave_record},
    ledger::{Allocation, DayCount, allocate, balance_store::deduct_balances, current_balances},
    person::PersonId,
};

/// A request to take `days` days of leave.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub person_id: PersonId,
    pub label: String,
    pub from_date: String,
    pub to_date: String,
    pub days: DayCount,
    /// An optional idempotency key. Resubmitting a request with the same key
    /// returns the original grant instead of deducting the days again.
    pub request_id: Option<String>,
}

/// The outcome of a successful [grant_leave] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grant {
    /// The ID of the new (or replayed) leave record.
    pub leave_id: LeaveId,
    /// How the requested days were split between the balances.
    pub allocation: Allocation,
    /// Whether this grant was returned from an earlier request with the same
    /// request ID.
    pub replayed: bool,
}

/// Grant leave to a person, deducting paid days first and then non-paid days.
///
/// The balance read, the balance write and the leave record insert happen in
/// one `IMMEDIATE` transaction. The write lock is taken before the balances
/// are read, so concurrent grants on any connection to the same database run
/// one after the other and each sees the balances the previous one committed.
/// If any step fails the transaction is rolled back and nothing changes.
///
/// SQLite locks the whole database, so grants for different people also wait
/// for each other. Within the server every handler shares one connection
/// behind a mutex, which serializes grants before they reach SQLite.
///
/// A request whose `request_id` matches an existing leave record is a replay
/// only if it is for the same person and the same number of days. The dates
/// and label are not compared because they can be edited after the grant.
///
/// # Errors
///
/// - [Error::UnknownPerson] if `request.person_id` does not exist.
/// - [Error::RequestIdConflict] if `request.request_id` was already used for
///   another person or a different number of days.
/// - [Error::InsufficientBalance] if the balances cannot cover the request.
/// - [Error::StaleBalance] or [Error::SqlError] if the database fails.
pub fn grant_leave(request: &LeaveRequest, connection: &Connection) -> Result<Grant, Error> {
    // Rolls back on drop unless committed.
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let existing = match &request.request_id {
        Some(request_id) => get_leave_by_request_id(request_id, &transaction)?,
        None => None,
    };

    if let Some(existing) = existing {
        let request_id = existing.request_id.clone().unwrap_or_default();

        if existing.person_id != request.person_id || existing.days != request.days.get() {
            return Err(Error::RequestIdConflict(request_id));
        }

        tracing::debug!(
            "replaying leave record {} for request {request_id}",
            existing.id
        );

        return Ok(Grant {
            leave_id: existing.id,
            allocation: existing.allocation(),
            replayed: true,
        });
    }

    let balances =
        current_balances(request.person_id, &transaction).map_err(|error| match error {
            Error::NotFound => Error::UnknownPerson(request.person_id),
            error => error,
        })?;

    let allocation = allocate(balances, request.days)?;

    deduct_balances(request.person_id, balances, allocation, &transaction)?;

    let record = insert_leave_record(
        NewLeaveRecord {
            label: request.label.trim(),
            from_date: request.from_date.trim(),
            to_date: request.to_date.trim(),
            person_id: request.person_id,
            allocation,
            request_id: request.request_id.as_deref(),
        },
        &transaction,
    )?;

    transaction.commit()?;

    tracing::info!(
        "granted {} day(s) of leave to person {} ({} paid, {} non-paid), leave record {}",
        allocation.total(),
        request.person_id,
        allocation.paid,
        allocation.non_paid,
        record.id
    );

    Ok(Grant {
        leave_id: record.id,
        allocation,
        replayed: false,
    })
}

#[cfg(test)]
mod grant_leave_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        leave::{delete_leave_record, get_all_leave_records, get_leave_record},
        ledger::{
            Allocation, Balances, DayCount, InsufficientBalance, LeaveRequest, current_balances,
            grant_leave,
        },
        person::{Person, PersonDetails, create_person, test_person_details},
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert_person(paid_days: i64, non_paid_days: i64, connection: &Connection) -> Person {
        create_person(
            PersonDetails {
                paid_days,
                non_paid_days,
                ..test_person_details("alice@example.com")
            },
            connection,
        )
        .expect("Could not create test person")
    }

    fn leave_request(person_id: i64, days: i64) -> LeaveRequest {
        LeaveRequest {
            person_id,
            label: "Summer holiday".to_owned(),
            from_date: "2024-07-01".to_owned(),
            to_date: "2024-07-20".to_owned(),
            days: DayCount::new(days).unwrap(),
            request_id: None,
        }
    }

    #[track_caller]
    fn assert_balances(person_id: i64, paid: i64, non_paid: i64, connection: &Connection) {
        assert_eq!(
            current_balances(person_id, connection),
            Ok(Balances { paid, non_paid })
        );
    }

    #[test]
    fn grants_leave_from_paid_days() {
        let connection = get_test_connection();
        let person = insert_person(20, 0, &connection);

        let grant = grant_leave(&leave_request(person.id, 5), &connection)
            .expect("Could not grant leave");

        assert_eq!(
            grant.allocation,
            Allocation {
                paid: 5,
                non_paid: 0
            }
        );
        assert!(!grant.replayed);
        assert_balances(person.id, 15, 0, &connection);

        let record = get_leave_record(grant.leave_id, &connection).expect("Could not get leave");
        assert_eq!(record.person_id, person.id);
        assert_eq!(record.days, 5);
        assert_eq!(record.label, "Summer holiday");
    }

    #[test]
    fn rejects_request_larger_than_balances() {
        let connection = get_test_connection();
        let person = insert_person(15, 0, &connection);

        let result = grant_leave(&leave_request(person.id, 20), &connection);

        assert_eq!(
            result,
            Err(Error::InsufficientBalance(InsufficientBalance {
                requested: 20,
                available_paid: 15,
                available_non_paid: 0,
            }))
        );
        assert_balances(person.id, 15, 0, &connection);
        assert_eq!(get_all_leave_records(&connection), Ok(vec![]));
    }

    #[test]
    fn spills_over_into_non_paid_days() {
        let connection = get_test_connection();
        let person = insert_person(5, 10, &connection);

        let grant = grant_leave(&leave_request(person.id, 8), &connection)
            .expect("Could not grant leave");

        assert_eq!(
            grant.allocation,
            Allocation {
                paid: 5,
                non_paid: 3
            }
        );
        assert_balances(person.id, 0, 7, &connection);
    }

    #[test]
    fn rejects_then_accepts_with_only_non_paid_days_left() {
        let connection = get_test_connection();
        let person = insert_person(0, 7, &connection);

        let rejected = grant_leave(&leave_request(person.id, 8), &connection);

        assert_eq!(
            rejected,
            Err(Error::InsufficientBalance(InsufficientBalance {
                requested: 8,
                available_paid: 0,
                available_non_paid: 7,
            }))
        );
        assert_balances(person.id, 0, 7, &connection);

        let grant = grant_leave(&leave_request(person.id, 7), &connection)
            .expect("Could not grant leave");

        assert_eq!(
            grant.allocation,
            Allocation {
                paid: 0,
                non_paid: 7
            }
        );
        assert_balances(person.id, 0, 0, &connection);
    }

    #[test]
    fn unknown_person_is_rejected() {
        let connection = get_test_connection();

        let result = grant_leave(&leave_request(42, 1), &connection);

        assert_eq!(result, Err(Error::UnknownPerson(42)));
    }

    #[test]
    fn failed_insert_rolls_back_balance_write() {
        let connection = get_test_connection();
        let person = insert_person(20, 0, &connection);
        connection
            .execute_batch(
                "CREATE TRIGGER reject_leave BEFORE INSERT ON leave_record
                BEGIN SELECT RAISE(ABORT, 'leave inserts are disabled'); END;",
            )
            .expect("Could not create trigger");

        let result = grant_leave(&leave_request(person.id, 5), &connection);

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error, got {result:?}"
        );
        assert_balances(person.id, 20, 0, &connection);
        assert!(connection.is_autocommit(), "want transaction to be closed");
        assert_eq!(get_all_leave_records(&connection), Ok(vec![]));
    }

    #[test]
    fn replayed_request_deducts_once() {
        let connection = get_test_connection();
        let person = insert_person(20, 0, &connection);
        let request = LeaveRequest {
            request_id: Some("4b7d6f2e-retry".to_owned()),
            ..leave_request(person.id, 5)
        };

        let first = grant_leave(&request, &connection).expect("Could not grant leave");
        let second = grant_leave(&request, &connection).expect("Could not replay grant");

        assert!(!first.replayed);
        assert!(second.replayed);
        assert_eq!(first.leave_id, second.leave_id);
        assert_eq!(first.allocation, second.allocation);
        assert_balances(person.id, 15, 0, &connection);
        assert_eq!(get_all_leave_records(&connection).unwrap().len(), 1);
    }

    #[test]
    fn request_id_cannot_be_reused_for_another_person() {
        let connection = get_test_connection();
        let alice = insert_person(20, 0, &connection);
        let bob = create_person(test_person_details("bob@example.com"), &connection)
            .expect("Could not create test person");
        let request = LeaveRequest {
            request_id: Some("shared".to_owned()),
            ..leave_request(alice.id, 5)
        };
        grant_leave(&request, &connection).expect("Could not grant leave");

        let result = grant_leave(
            &LeaveRequest {
                person_id: bob.id,
                ..request
            },
            &connection,
        );

        assert_eq!(result, Err(Error::RequestIdConflict("shared".to_owned())));
        assert_balances(bob.id, 20, 0, &connection);
    }

    #[test]
    fn request_id_cannot_be_reused_for_different_days() {
        let connection = get_test_connection();
        let person = insert_person(20, 0, &connection);
        let request = LeaveRequest {
            request_id: Some("k".to_owned()),
            ..leave_request(person.id, 5)
        };
        grant_leave(&request, &connection).expect("Could not grant leave");

        let result = grant_leave(
            &LeaveRequest {
                days: DayCount::new(12).unwrap(),
                ..request
            },
            &connection,
        );

        assert_eq!(result, Err(Error::RequestIdConflict("k".to_owned())));
        assert_balances(person.id, 15, 0, &connection);
        assert_eq!(get_all_leave_records(&connection).unwrap().len(), 1);
    }

    #[test]
    fn replay_ignores_edited_dates() {
        let connection = get_test_connection();
        let person = insert_person(20, 0, &connection);
        let request = LeaveRequest {
            request_id: Some("moved".to_owned()),
            ..leave_request(person.id, 5)
        };
        let first = grant_leave(&request, &connection).expect("Could not grant leave");

        let second = grant_leave(
            &LeaveRequest {
                from_date: "2024-08-01".to_owned(),
                to_date: "2024-08-05".to_owned(),
                ..request
            },
            &connection,
        )
        .expect("Could not replay grant");

        assert!(second.replayed);
        assert_eq!(first.leave_id, second.leave_id);
        assert_balances(person.id, 15, 0, &connection);
    }

    #[test]
    fn deleting_leave_does_not_restore_balances() {
        let connection = get_test_connection();
        let person = insert_person(20, 0, &connection);
        let grant = grant_leave(&leave_request(person.id, 5), &connection)
            .expect("Could not grant leave");

        delete_leave_record(grant.leave_id, &connection).expect("Could not delete leave");

        assert_balances(person.id, 15, 0, &connection);
    }

    #[test]
    fn balances_stay_conserved_over_many_grants() {
        let connection = get_test_connection();
        let person = insert_person(12, 9, &connection);
        let mut granted = 0;

        for days in [4, 1, 6, 3, 5, 2, 1] {
            match grant_leave(&leave_request(person.id, days), &connection) {
                Ok(grant) => {
                    assert_eq!(grant.allocation.total(), days);
                    granted += days;
                }
                Err(Error::InsufficientBalance(_)) => {}
                Err(error) => panic!("unexpected error: {error}"),
            }
        }

        let balances = current_balances(person.id, &connection).unwrap();
        assert_eq!(balances.paid + balances.non_paid, 21 - granted);
        assert!(balances.paid >= 0 && balances.non_paid >= 0);
    }
}
