//! Reads and conditionally decrements the leave balances stored on each
//! person's row.

use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, ledger::Allocation, person::PersonId};

/// A person's remaining leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balances {
    /// Paid vacation days.
    pub paid: i64,
    /// Non-paid leave days.
    pub non_paid: i64,
}

/// Get the balances for `person_id`.
///
/// When called on an open leave transaction, the read is protected by that
/// transaction's write lock. Otherwise the result may be stale by the time it
/// is displayed.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no person with `person_id`, or
/// [Error::SqlError] if the query fails.
pub fn current_balances(person_id: PersonId, connection: &Connection) -> Result<Balances, Error> {
    connection
        .prepare("SELECT paid_days, non_paid_days FROM person WHERE id = :id;")?
        .query_row(&[(":id", &person_id)], |row| {
            Ok(Balances {
                paid: row.get(0)?,
                non_paid: row.get(1)?,
            })
        })
        .map_err(Error::from)
}

/// Subtract `allocation` from the balances of `person_id`, but only if they
/// still equal `expected`.
///
/// # Errors
///
/// Returns [Error::StaleBalance] if no row matched `person_id` and `expected`.
pub(super) fn deduct_balances(
    person_id: PersonId,
    expected: Balances,
    allocation: Allocation,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE person
        SET paid_days = paid_days - ?1, non_paid_days = non_paid_days - ?2
        WHERE id = ?3 AND paid_days = ?4 AND non_paid_days = ?5",
        (
            allocation.paid,
            allocation.non_paid,
            person_id,
            expected.paid,
            expected.non_paid,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::StaleBalance(person_id));
    }

    Ok(())
}

#[cfg(test)]
mod balance_store_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        ledger::{Allocation, Balances, current_balances},
        person::{Person, create_person, test_person_details},
    };

    use super::deduct_balances;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert_person(paid_days: i64, non_paid_days: i64, connection: &Connection) -> Person {
        let mut details = test_person_details("alice@example.com");
        details.paid_days = paid_days;
        details.non_paid_days = non_paid_days;

        create_person(details, connection).expect("Could not create test person")
    }

    #[test]
    fn reads_balances() {
        let connection = get_test_connection();
        let person = insert_person(20, 3, &connection);

        let balances = current_balances(person.id, &connection);

        assert_eq!(
            balances,
            Ok(Balances {
                paid: 20,
                non_paid: 3
            })
        );
    }

    #[test]
    fn missing_person_is_not_found() {
        let connection = get_test_connection();

        let balances = current_balances(1337, &connection);

        assert_eq!(balances, Err(Error::NotFound));
    }

    #[test]
    fn deducts_both_balances() {
        let connection = get_test_connection();
        let person = insert_person(5, 10, &connection);

        deduct_balances(
            person.id,
            Balances {
                paid: 5,
                non_paid: 10,
            },
            Allocation {
                paid: 5,
                non_paid: 3,
            },
            &connection,
        )
        .expect("Could not deduct balances");

        assert_eq!(
            current_balances(person.id, &connection),
            Ok(Balances {
                paid: 0,
                non_paid: 7
            })
        );
    }

    #[test]
    fn refuses_to_deduct_from_changed_balances() {
        let connection = get_test_connection();
        let person = insert_person(5, 10, &connection);

        let result = deduct_balances(
            person.id,
            Balances {
                paid: 6,
                non_paid: 10,
            },
            Allocation {
                paid: 5,
                non_paid: 0,
            },
            &connection,
        );

        assert_eq!(result, Err(Error::StaleBalance(person.id)));
        assert_eq!(
            current_balances(person.id, &connection),
            Ok(Balances {
                paid: 5,
                non_paid: 10
            })
        );
    }
}
