//! People and their leave balances.

mod create;
mod db;
mod delete;
mod detail;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_person_endpoint, get_new_person_page};
pub use db::{
    count_leave_per_person, create_person, create_person_table, delete_person, get_all_people,
    get_person, update_person,
};
pub use delete::delete_person_endpoint;
pub use detail::get_person_page;
#[cfg(test)]
pub(crate) use domain::test_person_details;
pub use domain::{Person, PersonDetails, PersonForm, PersonId};
pub use edit::{get_edit_person_page, update_person_endpoint};
pub use list::get_people_page;
