//! Leave-period accounting
//!
//! - [`period`]: which pay-period window a date falls in
//! - [`policy`]: quota and duplicate checks before a ledger write
//! - [`reconcile`]: read-time repair of the denormalized employee status
//! - [`locks`]: per-employee serialization of check-then-write
//! - [`service`]: the transactional operations the API calls

pub mod error;
pub mod locks;
pub mod period;
pub mod policy;
pub mod reconcile;
pub mod service;

pub use error::LeaveError;
pub use locks::EmployeeLocks;
pub use period::{LeavePeriod, period_for};
pub use policy::{LeavePolicy, assert_can_mark_leave};
pub use reconcile::reconcile_leave_statuses;
pub use service::LeaveService;
