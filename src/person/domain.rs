//! Core person domain types.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId, ledger::Balances};

/// Database identifier for a person.
pub type PersonId = DatabaseId;

/// An employee who takes leave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
    /// The remaining paid vacation days.
    pub paid_days: i64,
    /// The remaining non-paid leave days.
    pub non_paid_days: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Person {
    /// The person's first and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The person's leave balances.
    pub fn balances(&self) -> Balances {
        Balances {
            paid: self.paid_days,
            non_paid: self.non_paid_days,
        }
    }
}

/// Validated details for creating or updating a person.
///
/// Use [PersonForm::validate] to create one from user input.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonDetails {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
    pub paid_days: i64,
    pub non_paid_days: i64,
}

/// Form data for person creation and editing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonForm {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
    pub paid_days: i64,
    pub non_paid_days: i64,
}

impl PersonForm {
    /// Check the form and trim surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - [Error::EmptyName] if either name is blank.
    /// - [Error::InvalidEmail] if the email address cannot be parsed.
    /// - [Error::NegativeBalance] if either balance is below zero.
    pub fn validate(self) -> Result<PersonDetails, Error> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::EmptyName);
        }

        if !EmailAddress::is_valid(email) {
            return Err(Error::InvalidEmail(email.to_owned()));
        }

        if self.paid_days < 0 || self.non_paid_days < 0 {
            return Err(Error::NegativeBalance);
        }

        Ok(PersonDetails {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            age: self.age,
            email: email.to_owned(),
            paid_days: self.paid_days,
            non_paid_days: self.non_paid_days,
        })
    }
}

impl From<&Person> for PersonForm {
    fn from(person: &Person) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            age: person.age,
            email: person.email.clone(),
            paid_days: person.paid_days,
            non_paid_days: person.non_paid_days,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_person_details(email: &str) -> PersonDetails {
    PersonDetails {
        first_name: "Alice".to_owned(),
        last_name: "Smith".to_owned(),
        age: 25,
        email: email.to_owned(),
        paid_days: 20,
        non_paid_days: 0,
    }
}

#[cfg(test)]
mod person_form_tests {
    use crate::{Error, person::PersonForm};

    fn valid_form() -> PersonForm {
        PersonForm {
            first_name: " John ".to_owned(),
            last_name: "Doe".to_owned(),
            age: 30,
            email: "john.doe@example.com".to_owned(),
            paid_days: 20,
            non_paid_days: 5,
        }
    }

    #[test]
    fn trims_names() {
        let details = valid_form().validate().expect("Could not validate form");

        assert_eq!(details.first_name, "John");
        assert_eq!(details.last_name, "Doe");
    }

    #[test]
    fn rejects_blank_name() {
        let form = PersonForm {
            last_name: " \t".to_owned(),
            ..valid_form()
        };

        assert_eq!(form.validate(), Err(Error::EmptyName));
    }

    #[test]
    fn rejects_invalid_email() {
        let form = PersonForm {
            email: "not an email".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::InvalidEmail("not an email".to_owned()))
        );
    }

    #[test]
    fn rejects_negative_balances() {
        let form = PersonForm {
            non_paid_days: -1,
            ..valid_form()
        };

        assert_eq!(form.validate(), Err(Error::NegativeBalance));
    }
}
