//! Leave records: listing, viewing, granting, editing and deleting leave.

mod create;
mod db;
mod delete;
mod detail;
mod domain;
mod edit;
mod list;

pub use create::{create_leave_endpoint, get_new_leave_page};
pub(crate) use db::insert_leave_record;
pub use db::{
    create_leave_table, delete_leave_record, get_active_leave, get_all_leave_records,
    get_leave_by_request_id, get_leave_for_person, get_leave_record, update_leave_details,
};
pub use delete::delete_leave_endpoint;
pub use detail::get_leave_page;
pub use domain::{LeaveDetailsForm, LeaveForm, LeaveId, LeaveRecord, NewLeaveRecord};
pub use edit::{get_edit_leave_page, update_leave_endpoint};
pub use list::get_leave_list_page;
