use crate::latency::Latency;
use crate::model::{Permission, Role, User};
use crate::repository::{InMemoryRepository, Repository};
use crate::seed;
use crate::services::{PermissionService, RoleService, UserService};
use std::sync::Arc;

/// Composition root: owns one repository per collection and the services over them.
pub struct AdminConsole {
    pub users: UserService,
    pub roles: RoleService,
    pub permissions: PermissionService,
}

impl AdminConsole {
    pub fn new(
        users: Arc<dyn Repository<User>>,
        roles: Arc<dyn Repository<Role>>,
        permissions: Arc<dyn Repository<Permission>>,
        latency: Latency,
    ) -> Self {
        Self {
            users: UserService::new(users, latency),
            roles: RoleService::new(roles, latency),
            permissions: PermissionService::new(permissions, latency),
        }
    }

    /// Console over fresh copies of the mock collections.
    pub fn seeded(latency: Latency) -> Self {
        Self::new(
            Arc::new(InMemoryRepository::new(seed::users())),
            Arc::new(InMemoryRepository::new(seed::roles())),
            Arc::new(InMemoryRepository::new(seed::permissions())),
            latency,
        )
    }
}
