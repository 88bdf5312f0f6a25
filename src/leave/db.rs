//! Database operations for leave records.
//!
//! Records are inserted by the ledger as part of granting leave. Edits and
//! deletes here never touch a person's balances.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    leave::{LeaveDetailsForm, LeaveId, LeaveRecord, NewLeaveRecord},
    person::PersonId,
    timezone::utc_now,
};

const SELECT_COLUMNS: &str = "SELECT id, label, from_date, to_date, person_id, days, paid_days, \
    non_paid_days, request_id, created_at FROM leave_record";

/// Insert a leave record and return it with its generated ID.
///
/// Callers outside the ledger must not use this, since it does not deduct any
/// balance.
pub(crate) fn insert_leave_record(
    record: NewLeaveRecord,
    connection: &Connection,
) -> Result<LeaveRecord, Error> {
    let created_at = utc_now();

    connection.execute(
        "INSERT INTO leave_record
        (label, from_date, to_date, person_id, days, paid_days, non_paid_days, request_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            record.label,
            record.from_date,
            record.to_date,
            record.person_id,
            record.allocation.total(),
            record.allocation.paid,
            record.allocation.non_paid,
            record.request_id,
            created_at,
        ),
    )?;

    Ok(LeaveRecord {
        id: connection.last_insert_rowid(),
        label: record.label.to_owned(),
        from_date: record.from_date.to_owned(),
        to_date: record.to_date.to_owned(),
        person_id: record.person_id,
        days: record.allocation.total(),
        paid_days: record.allocation.paid,
        non_paid_days: record.allocation.non_paid,
        request_id: record.request_id.map(str::to_owned),
        created_at,
    })
}

/// Retrieve a leave record by ID.
pub fn get_leave_record(leave_id: LeaveId, connection: &Connection) -> Result<LeaveRecord, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_row(&[(":id", &leave_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve the leave record created with `request_id`, if there is one.
pub fn get_leave_by_request_id(
    request_id: &str,
    connection: &Connection,
) -> Result<Option<LeaveRecord>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE request_id = :request_id"))?
        .query_row(&[(":request_id", &request_id)], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all leave records, most recent first.
pub fn get_all_leave_records(connection: &Connection) -> Result<Vec<LeaveRecord>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY from_date DESC, id DESC"))?
        .query_map([], map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the leave records for a single person, most recent first.
pub fn get_leave_for_person(
    person_id: PersonId,
    connection: &Connection,
) -> Result<Vec<LeaveRecord>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE person_id = :person_id ORDER BY from_date DESC, id DESC"
        ))?
        .query_map(&[(":person_id", &person_id)], map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the leave records that include `date`, formatted as `YYYY-MM-DD`.
///
/// Dates are compared as text, so records whose dates are not in ISO 8601
/// format will not match.
pub fn get_active_leave(date: &str, connection: &Connection) -> Result<Vec<LeaveRecord>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE :date BETWEEN from_date AND to_date ORDER BY from_date ASC, id ASC"
        ))?
        .query_map(&[(":date", &date)], map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Change the label and dates of a leave record.
///
/// The number of days and the allocation are fixed once leave is granted.
pub fn update_leave_details(
    leave_id: LeaveId,
    details: &LeaveDetailsForm,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE leave_record SET label = ?1, from_date = ?2, to_date = ?3 WHERE id = ?4",
        (
            details.label.trim(),
            details.from_date.trim(),
            details.to_date.trim(),
            leave_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingLeave);
    }

    Ok(())
}

/// Delete a leave record. The days it used are not returned to the person.
pub fn delete_leave_record(leave_id: LeaveId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM leave_record WHERE id = ?1", [leave_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingLeave);
    }

    Ok(())
}

/// Initialize the leave record table. The person table must already exist.
pub fn create_leave_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS leave_record (
            id INTEGER PRIMARY KEY,
            label TEXT NOT NULL,
            from_date TEXT NOT NULL,
            to_date TEXT NOT NULL,
            person_id INTEGER NOT NULL,
            days INTEGER NOT NULL CHECK (days > 0),
            paid_days INTEGER NOT NULL CHECK (paid_days >= 0),
            non_paid_days INTEGER NOT NULL CHECK (non_paid_days >= 0),
            request_id TEXT UNIQUE,
            created_at TEXT NOT NULL,
            FOREIGN KEY(person_id) REFERENCES person(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_leave_record_person ON leave_record(person_id);
        CREATE INDEX IF NOT EXISTS idx_leave_record_dates ON leave_record(from_date, to_date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<LeaveRecord, rusqlite::Error> {
    Ok(LeaveRecord {
        id: row.get(0)?,
        label: row.get(1)?,
        from_date: row.get(2)?,
        to_date: row.get(3)?,
        person_id: row.get(4)?,
        days: row.get(5)?,
        paid_days: row.get(6)?,
        non_paid_days: row.get(7)?,
        request_id: row.get(8)?,
        created_at: row.get(9)?,
    })
}
