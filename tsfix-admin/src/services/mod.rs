mod permissions;
mod roles;
mod users;

pub use permissions::{PermissionForm, PermissionQuery, PermissionService, PermissionSort};
pub use roles::{RoleForm, RoleQuery, RoleService, RoleSort};
pub use users::{UserForm, UserQuery, UserService};

use chrono::{Local, NaiveDateTime, Timelike};

/// Current local time at second precision.
pub(crate) fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
