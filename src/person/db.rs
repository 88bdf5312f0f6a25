//! Database operations for people.
//!
//! Apart from [create_person] and [update_person], balances are only changed by
//! the leave ledger.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    person::{Person, PersonDetails, PersonId},
    timezone::utc_now,
};

/// Create a person and return it with its generated ID.
pub fn create_person(details: PersonDetails, connection: &Connection) -> Result<Person, Error> {
    let created_at = utc_now();

    connection.execute(
        "INSERT INTO person (first_name, last_name, age, email, paid_days, non_paid_days, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        (
            &details.first_name,
            &details.last_name,
            details.age,
            &details.email,
            details.paid_days,
            details.non_paid_days,
            created_at,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Person {
        id,
        first_name: details.first_name,
        last_name: details.last_name,
        age: details.age,
        email: details.email,
        paid_days: details.paid_days,
        non_paid_days: details.non_paid_days,
        created_at,
    })
}

/// Retrieve a single person by ID.
pub fn get_person(person_id: PersonId, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare(
            "SELECT id, first_name, last_name, age, email, paid_days, non_paid_days, created_at
            FROM person WHERE id = :id;",
        )?
        .query_row(&[(":id", &person_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve everyone ordered by last name, then first name.
pub fn get_all_people(connection: &Connection) -> Result<Vec<Person>, Error> {
    connection
        .prepare(
            "SELECT id, first_name, last_name, age, email, paid_days, non_paid_days, created_at
            FROM person ORDER BY last_name ASC, first_name ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_person| maybe_person.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a person's details, including their balances.
///
/// This is an administrative override: the new balances are written as is and
/// no leave record is created.
pub fn update_person(
    person_id: PersonId,
    details: PersonDetails,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE person
        SET first_name = ?1, last_name = ?2, age = ?3, email = ?4, paid_days = ?5, non_paid_days = ?6
        WHERE id = ?7",
        (
            &details.first_name,
            &details.last_name,
            details.age,
            &details.email,
            details.paid_days,
            details.non_paid_days,
            person_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPerson);
    }

    tracing::info!(
        "balances for person {person_id} set to {} paid and {} non-paid days",
        details.paid_days,
        details.non_paid_days
    );

    Ok(())
}

/// Delete a person and, through the foreign key, all of their leave records.
pub fn delete_person(person_id: PersonId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM person WHERE id = ?1", [person_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPerson);
    }

    Ok(())
}

/// Count the leave records held by each person. People without leave are omitted.
pub fn count_leave_per_person(connection: &Connection) -> Result<HashMap<PersonId, u32>, Error> {
    let result: Result<HashMap<PersonId, u32>, rusqlite::Error> = connection
        .prepare("SELECT person_id, COUNT(1) FROM leave_record GROUP BY person_id")?
        .query_map((), |row| {
            let person_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((person_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the person table.
pub fn create_person_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            age INTEGER NOT NULL,
            email TEXT NOT NULL UNIQUE,
            paid_days INTEGER NOT NULL,
            non_paid_days INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_person_name ON person(last_name, first_name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Person, rusqlite::Error> {
    Ok(Person {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        age: row.get(3)?,
        email: row.get(4)?,
        paid_days: row.get(5)?,
        non_paid_days: row.get(6)?,
        created_at: row.get(7)?,
    })
}
