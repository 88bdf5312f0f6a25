use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;

use vacation_tool::{
    DEFAULT_BUSY_TIMEOUT, DayCount, LeaveRequest, PersonDetails, create_person, grant_leave,
    open_db,
};

/// A utility for creating a test database for the vacation tool server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = open_db(output_path, DEFAULT_BUSY_TIMEOUT)?;

    println!("Creating test people...");

    let people = [
        ("Alice", "Smith", 34, "alice@example.com", 20, 0),
        ("Bob", "Brown", 41, "bob@example.com", 5, 10),
        ("Carol", "Jones", 28, "carol@example.com", 0, 7),
    ];

    let mut person_ids = Vec::with_capacity(people.len());

    for (first_name, last_name, age, email, paid_days, non_paid_days) in people {
        let person = create_person(
            PersonDetails {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                age,
                email: email.to_owned(),
                paid_days,
                non_paid_days,
            },
            &conn,
        )?;

        person_ids.push(person.id);
    }

    println!("Granting leave...");

    let leave = [
        (person_ids[0], "Summer holiday", "2025-01-06", "2025-01-10", 5),
        (person_ids[1], "Family visit", "2025-03-03", "2025-03-12", 8),
        (person_ids[2], "Study leave", "2025-05-19", "2025-05-21", 3),
    ];

    for (person_id, label, from_date, to_date, days) in leave {
        let grant = grant_leave(
            &LeaveRequest {
                person_id,
                label: label.to_owned(),
                from_date: from_date.to_owned(),
                to_date: to_date.to_owned(),
                days: DayCount::new(days)?,
                request_id: None,
            },
            &conn,
        )?;

        println!(
            "  {label}: {} paid, {} non-paid",
            grant.allocation.paid, grant.allocation.non_paid
        );
    }

    println!("Success!");

    Ok(())
}
