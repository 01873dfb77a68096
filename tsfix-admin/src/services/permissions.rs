use crate::error::ValidationError;
use crate::latency::{Latency, pause};
use crate::model::{Permission, PermissionModule, PermissionStatus, PermissionType};
use crate::query::{Page, PageRequest, SortOrder, contains_ci, keyword, paginate};
use crate::repository::Repository;
use crate::response::{ApiResponse, BatchDeleted, SelectOption};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::debug;

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]+:[a-z_]+$").expect("permission code pattern compiles"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSort {
    Id,
    Name,
    Code,
    #[default]
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionQuery {
    pub keyword: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PermissionType>,
    pub module: Option<PermissionModule>,
    pub status: Option<PermissionStatus>,
    #[serde(default)]
    pub sort_by: PermissionSort,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionForm {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PermissionType,
    pub module: PermissionModule,
    pub status: PermissionStatus,
}

pub struct PermissionService {
    repo: Arc<dyn Repository<Permission>>,
    latency: Latency,
}

impl PermissionService {
    pub fn new(repo: Arc<dyn Repository<Permission>>, latency: Latency) -> Self {
        Self { repo, latency }
    }

    pub async fn list(&self, query: &PermissionQuery) -> ApiResponse<Page<Permission>> {
        pause(self.latency.list).await;
        let kw = keyword(query.keyword.as_deref());
        let mut items: Vec<Permission> = self
            .repo
            .all()
            .into_iter()
            .filter(|p| {
                kw.as_deref().is_none_or(|k| {
                    contains_ci(&p.name, k)
                        || contains_ci(&p.code, k)
                        || p.description.as_deref().is_some_and(|d| contains_ci(d, k))
                })
            })
            .filter(|p| query.kind.is_none_or(|t| p.kind == t))
            .filter(|p| query.module.is_none_or(|m| p.module == m))
            .filter(|p| query.status.is_none_or(|s| p.status == s))
            .collect();
        items.sort_by(|a, b| {
            let ord = match query.sort_by {
                PermissionSort::Id => a.id.cmp(&b.id),
                PermissionSort::Name => a.name.cmp(&b.name),
                PermissionSort::Code => a.code.cmp(&b.code),
                PermissionSort::CreatedAt => a.created_at.cmp(&b.created_at),
                PermissionSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            query.sort_order.apply(ord)
        });
        ApiResponse::ok(paginate(items, query.page), "fetched")
    }

    pub async fn get(&self, id: u64) -> ApiResponse<Permission> {
        pause(self.latency.get).await;
        ApiResponse::from_result(self.find(id), "fetched")
    }

    pub async fn create(&self, form: PermissionForm) -> ApiResponse<Permission> {
        pause(self.latency.mutate).await;
        ApiResponse::from_result(self.insert(form), "created")
    }

    pub async fn update(&self, id: u64, form: PermissionForm) -> ApiResponse<Permission> {
        pause(self.latency.mutate).await;
        ApiResponse::from_result(self.replace(id, form), "updated")
    }

    pub async fn delete(&self, id: u64) -> ApiResponse<()> {
        pause(self.latency.mutate).await;
        let result = match self.repo.remove(id) {
            Some(_) => {
                debug!(id, "permission deleted");
                Ok(())
            }
            None => Err(ValidationError::NotFound {
                entity: "permission",
                id,
            }),
        };
        ApiResponse::from_result(result, "deleted")
    }

    pub async fn batch_delete(&self, ids: &[u64]) -> ApiResponse<BatchDeleted> {
        pause(self.latency.batch).await;
        let deleted = ids.iter().filter(|id| self.repo.remove(**id).is_some()).count();
        if deleted == 0 {
            return ApiResponse::fail(&ValidationError::NothingDeleted {
                entity: "permissions",
                details: Vec::new(),
            });
        }
        let outcome = BatchDeleted {
            deleted,
            skipped: Vec::new(),
        };
        let message = outcome.message("permissions");
        ApiResponse::ok(outcome, message)
    }

    /// Active permissions for a select box, labelled `name (code)`.
    pub async fn permission_options(&self) -> ApiResponse<Vec<SelectOption<u64>>> {
        pause(self.latency.get).await;
        let options = self
            .repo
            .all()
            .into_iter()
            .filter(|p| p.status == PermissionStatus::Active)
            .map(|p| SelectOption {
                label: format!("{} ({})", p.name, p.code),
                value: p.id,
            })
            .collect();
        ApiResponse::ok(options, "fetched")
    }

    fn insert(&self, form: PermissionForm) -> Result<Permission, ValidationError> {
        self.check(&form, None)?;
        let now = super::now();
        let permission = self.repo.insert(Permission {
            id: 0,
            name: form.name,
            code: form.code,
            description: form.description,
            kind: form.kind,
            module: form.module,
            status: form.status,
            created_at: now,
            updated_at: now,
        });
        debug!(id = permission.id, code = %permission.code, "permission created");
        Ok(permission)
    }

    fn replace(&self, id: u64, form: PermissionForm) -> Result<Permission, ValidationError> {
        let current = self.find(id)?;
        self.check(&form, Some(id))?;
        let updated = Permission {
            name: form.name,
            code: form.code,
            description: form.description,
            kind: form.kind,
            module: form.module,
            status: form.status,
            updated_at: super::now(),
            ..current
        };
        self.repo
            .replace(updated.clone())
            .ok_or(ValidationError::NotFound {
                entity: "permission",
                id,
            })?;
        debug!(id, "permission updated");
        Ok(updated)
    }

    fn find(&self, id: u64) -> Result<Permission, ValidationError> {
        self.repo.get(id).ok_or(ValidationError::NotFound {
            entity: "permission",
            id,
        })
    }

    /// Name and code must be unique among the other entries; the code must read `module:action`.
    fn check(&self, form: &PermissionForm, own_id: Option<u64>) -> Result<(), ValidationError> {
        if form.name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "required"));
        }
        let others: Vec<Permission> = self
            .repo
            .all()
            .into_iter()
            .filter(|p| Some(p.id) != own_id)
            .collect();
        if others.iter().any(|p| p.name == form.name) {
            return Err(ValidationError::Duplicate {
                field: "permission name",
            });
        }
        if others.iter().any(|p| p.code == form.code) {
            return Err(ValidationError::Duplicate {
                field: "permission code",
            });
        }
        if !CODE.is_match(&form.code) {
            return Err(ValidationError::invalid(
                "code",
                "expected module:action in lowercase letters and underscores",
            ));
        }
        Ok(())
    }
}
