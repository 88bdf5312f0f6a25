//! The leave ledger: deciding how leave is split between paid and non-paid
//! days and applying that split to a person's balances atomically.

mod allocator;
mod balance_store;
mod coordinator;

pub use allocator::{Allocation, DayCount, InsufficientBalance, allocate};
pub use balance_store::{Balances, current_balances};
pub use coordinator::{Grant, LeaveRequest, grant_leave};
