//! Data layer of the admin console: user, role and permission services over injected in-memory
//! repositories, answering with a `{success, data, message, code}` envelope.

mod console;
mod error;
mod latency;
pub mod model;
mod query;
mod repository;
mod response;
pub mod seed;
mod services;

pub use console::AdminConsole;
pub use error::ValidationError;
pub use latency::Latency;
pub use query::{DEFAULT_PAGE_SIZE, Page, PageRequest, SortOrder, paginate};
pub use repository::{InMemoryRepository, Repository};
pub use response::{ApiResponse, BatchDeleted, CODE_OK, SelectOption};
pub use services::{
    PermissionForm, PermissionQuery, PermissionService, PermissionSort, RoleForm, RoleQuery,
    RoleService, RoleSort, UserForm, UserQuery, UserService,
};
