use crate::error::ValidationError;
use crate::latency::{Latency, pause};
use crate::model::{Capability, Role, RoleStatus};
use crate::query::{Page, PageRequest, SortOrder, contains_ci, keyword, paginate};
use crate::repository::Repository;
use crate::response::{ApiResponse, BatchDeleted, SelectOption};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSort {
    Id,
    Name,
    #[default]
    CreatedAt,
    UpdatedAt,
    UserCount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuery {
    pub keyword: Option<String>,
    pub status: Option<RoleStatus>,
    pub permission: Option<Capability>,
    #[serde(default)]
    pub sort_by: RoleSort,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub permissions: Vec<Capability>,
    pub status: RoleStatus,
}

impl RoleForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let len = self.name.trim().chars().count();
        if !(1..=50).contains(&len) {
            return Err(ValidationError::invalid("name", "1 to 50 characters"));
        }
        Ok(())
    }
}

pub struct RoleService {
    repo: Arc<dyn Repository<Role>>,
    latency: Latency,
}

impl RoleService {
    pub fn new(repo: Arc<dyn Repository<Role>>, latency: Latency) -> Self {
        Self { repo, latency }
    }

    pub async fn list(&self, query: &RoleQuery) -> ApiResponse<Page<Role>> {
        pause(self.latency.list).await;
        let kw = keyword(query.keyword.as_deref());
        let mut roles: Vec<Role> = self
            .repo
            .all()
            .into_iter()
            .filter(|r| {
                kw.as_deref().is_none_or(|k| {
                    contains_ci(&r.name, k)
                        || r.description.as_deref().is_some_and(|d| contains_ci(d, k))
                })
            })
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .filter(|r| query.permission.is_none_or(|p| r.permissions.contains(&p)))
            .collect();
        roles.sort_by(|a, b| {
            let ord = match query.sort_by {
                RoleSort::Id => a.id.cmp(&b.id),
                RoleSort::Name => a.name.cmp(&b.name),
                RoleSort::CreatedAt => a.created_at.cmp(&b.created_at),
                RoleSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                RoleSort::UserCount => a.user_count.cmp(&b.user_count),
            };
            query.sort_order.apply(ord)
        });
        ApiResponse::ok(paginate(roles, query.page), "fetched")
    }

    pub async fn get(&self, id: u64) -> ApiResponse<Role> {
        pause(self.latency.get).await;
        ApiResponse::from_result(self.find(id), "fetched")
    }

    pub async fn create(&self, form: RoleForm) -> ApiResponse<Role> {
        pause(self.latency.mutate).await;
        ApiResponse::from_result(self.insert(form), "created")
    }

    pub async fn update(&self, id: u64, form: RoleForm) -> ApiResponse<Role> {
        pause(self.latency.mutate).await;
        ApiResponse::from_result(self.replace(id, form), "updated")
    }

    pub async fn delete(&self, id: u64) -> ApiResponse<()> {
        pause(self.latency.mutate).await;
        let result = self.find(id).and_then(|role| {
            ensure_unused(&role)?;
            self.repo.remove(id);
            debug!(id, "role deleted");
            Ok(())
        });
        ApiResponse::from_result(result, "deleted")
    }

    /// Deletes every listed role without users; roles that still have users are reported.
    pub async fn batch_delete(&self, ids: &[u64]) -> ApiResponse<BatchDeleted> {
        pause(self.latency.batch).await;
        let mut deleted = 0;
        let mut skipped = Vec::new();
        for &id in ids {
            let Some(role) = self.repo.get(id) else {
                continue;
            };
            if let Err(err) = ensure_unused(&role) {
                skipped.push(err.to_string());
                continue;
            }
            if self.repo.remove(id).is_some() {
                deleted += 1;
            }
        }
        if deleted == 0 {
            return ApiResponse::fail(&ValidationError::NothingDeleted {
                entity: "roles",
                details: skipped,
            });
        }
        let outcome = BatchDeleted { deleted, skipped };
        let message = outcome.message("roles");
        ApiResponse::ok(outcome, message)
    }

    /// Active roles for a select box.
    pub async fn role_options(&self) -> ApiResponse<Vec<SelectOption<u64>>> {
        pause(self.latency.get).await;
        let options = self
            .repo
            .all()
            .into_iter()
            .filter(|r| r.status == RoleStatus::Active)
            .map(|r| SelectOption {
                label: r.name,
                value: r.id,
            })
            .collect();
        ApiResponse::ok(options, "fetched")
    }

    pub async fn permission_options(&self) -> ApiResponse<Vec<SelectOption<Capability>>> {
        pause(self.latency.get).await;
        let options = Capability::ALL
            .into_iter()
            .map(|c| SelectOption {
                label: c.label().to_string(),
                value: c,
            })
            .collect();
        ApiResponse::ok(options, "fetched")
    }

    fn insert(&self, form: RoleForm) -> Result<Role, ValidationError> {
        form.validate()?;
        self.check_unique(&form.name, None)?;
        let now = super::now();
        let role = self.repo.insert(Role {
            id: 0,
            name: form.name,
            description: form.description,
            permissions: form.permissions,
            status: form.status,
            created_at: now,
            updated_at: now,
            user_count: 0,
        });
        debug!(id = role.id, name = %role.name, "role created");
        Ok(role)
    }

    fn replace(&self, id: u64, form: RoleForm) -> Result<Role, ValidationError> {
        let current = self.find(id)?;
        form.validate()?;
        self.check_unique(&form.name, Some(id))?;
        let updated = Role {
            name: form.name,
            description: form.description,
            permissions: form.permissions,
            status: form.status,
            updated_at: super::now(),
            ..current
        };
        self.repo
            .replace(updated.clone())
            .ok_or(ValidationError::NotFound { entity: "role", id })?;
        debug!(id, "role updated");
        Ok(updated)
    }

    fn find(&self, id: u64) -> Result<Role, ValidationError> {
        self.repo
            .get(id)
            .ok_or(ValidationError::NotFound { entity: "role", id })
    }

    fn check_unique(&self, name: &str, own_id: Option<u64>) -> Result<(), ValidationError> {
        if self
            .repo
            .all()
            .iter()
            .any(|r| r.name == name && Some(r.id) != own_id)
        {
            return Err(ValidationError::Duplicate { field: "role name" });
        }
        Ok(())
    }
}

fn ensure_unused(role: &Role) -> Result<(), ValidationError> {
    if role.user_count > 0 {
        return Err(ValidationError::RoleInUse {
            name: role.name.clone(),
            users: role.user_count,
        });
    }
    Ok(())
}
