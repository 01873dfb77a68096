use crate::error::ValidationError;
use crate::latency::{Latency, pause};
use crate::model::{User, UserRole, UserStatus};
use crate::query::{Page, PageRequest, contains_ci, keyword, paginate};
use crate::repository::Repository;
use crate::response::{ApiResponse, BatchDeleted};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::debug;

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("username pattern compiles"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone pattern compiles"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub keyword: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub page: PageRequest,
}

/// Create/edit dialog contents. Passwords are checked, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl UserForm {
    fn validate(&self, creating: bool) -> Result<(), ValidationError> {
        if !USERNAME.is_match(&self.username) {
            return Err(ValidationError::invalid(
                "username",
                "3 to 20 letters, digits or underscores",
            ));
        }
        if !EMAIL.is_match(&self.email) {
            return Err(ValidationError::invalid("email", "not a valid address"));
        }
        if !PHONE.is_match(&self.phone) {
            return Err(ValidationError::invalid("phone", "not a valid mobile number"));
        }

        let password = self.password.as_deref().filter(|p| !p.is_empty());
        let confirm = self.confirm_password.as_deref().filter(|p| !p.is_empty());
        match password {
            None if creating => return Err(ValidationError::invalid("password", "required")),
            Some(p) if !(6..=20).contains(&p.chars().count()) => {
                return Err(ValidationError::invalid("password", "6 to 20 characters"));
            }
            _ => {}
        }
        match (password, confirm) {
            (_, None) if creating => {
                Err(ValidationError::invalid("confirm_password", "required"))
            }
            (Some(p), Some(c)) if p != c => Err(ValidationError::invalid(
                "confirm_password",
                "does not match the password",
            )),
            (None, Some(_)) => Err(ValidationError::invalid(
                "confirm_password",
                "does not match the password",
            )),
            _ => Ok(()),
        }
    }
}

pub struct UserService {
    repo: Arc<dyn Repository<User>>,
    latency: Latency,
}

impl UserService {
    pub fn new(repo: Arc<dyn Repository<User>>, latency: Latency) -> Self {
        Self { repo, latency }
    }

    pub async fn list(&self, query: &UserQuery) -> ApiResponse<Page<User>> {
        pause(self.latency.list).await;
        let kw = keyword(query.keyword.as_deref());
        let users: Vec<User> = self
            .repo
            .all()
            .into_iter()
            .filter(|u| {
                kw.as_deref().is_none_or(|k| {
                    contains_ci(&u.username, k) || contains_ci(&u.email, k) || u.phone.contains(k)
                })
            })
            .filter(|u| query.role.is_none_or(|r| u.role == r))
            .filter(|u| query.status.is_none_or(|s| u.status == s))
            .collect();
        ApiResponse::ok(paginate(users, query.page), "fetched")
    }

    pub async fn get(&self, id: u64) -> ApiResponse<User> {
        pause(self.latency.get).await;
        ApiResponse::from_result(self.find(id), "fetched")
    }

    pub async fn create(&self, form: UserForm) -> ApiResponse<User> {
        pause(self.latency.mutate).await;
        ApiResponse::from_result(self.insert(form), "created")
    }

    pub async fn update(&self, id: u64, form: UserForm) -> ApiResponse<User> {
        pause(self.latency.mutate).await;
        ApiResponse::from_result(self.replace(id, form), "updated")
    }

    pub async fn delete(&self, id: u64) -> ApiResponse<()> {
        pause(self.latency.mutate).await;
        let result = match self.repo.remove(id) {
            Some(_) => {
                debug!(id, "user deleted");
                Ok(())
            }
            None => Err(ValidationError::NotFound { entity: "user", id }),
        };
        ApiResponse::from_result(result, "deleted")
    }

    pub async fn batch_delete(&self, ids: &[u64]) -> ApiResponse<BatchDeleted> {
        pause(self.latency.batch).await;
        let deleted = ids.iter().filter(|id| self.repo.remove(**id).is_some()).count();
        if deleted == 0 {
            return ApiResponse::fail(&ValidationError::NothingDeleted {
                entity: "users",
                details: Vec::new(),
            });
        }
        let outcome = BatchDeleted {
            deleted,
            skipped: Vec::new(),
        };
        let message = outcome.message("users");
        ApiResponse::ok(outcome, message)
    }

    fn insert(&self, form: UserForm) -> Result<User, ValidationError> {
        form.validate(true)?;
        self.check_unique(&form, None)?;
        let now = super::now();
        let user = self.repo.insert(User {
            id: 0,
            username: form.username,
            email: form.email,
            phone: form.phone,
            role: form.role,
            status: form.status,
            created_at: now,
            updated_at: now,
        });
        debug!(id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    fn replace(&self, id: u64, form: UserForm) -> Result<User, ValidationError> {
        let current = self.find(id)?;
        form.validate(false)?;
        self.check_unique(&form, Some(id))?;
        let updated = User {
            username: form.username,
            email: form.email,
            phone: form.phone,
            role: form.role,
            status: form.status,
            updated_at: super::now(),
            ..current
        };
        self.repo
            .replace(updated.clone())
            .ok_or(ValidationError::NotFound { entity: "user", id })?;
        debug!(id, "user updated");
        Ok(updated)
    }

    fn find(&self, id: u64) -> Result<User, ValidationError> {
        self.repo
            .get(id)
            .ok_or(ValidationError::NotFound { entity: "user", id })
    }

    fn check_unique(&self, form: &UserForm, own_id: Option<u64>) -> Result<(), ValidationError> {
        let others: Vec<User> = self
            .repo
            .all()
            .into_iter()
            .filter(|u| Some(u.id) != own_id)
            .collect();
        if others.iter().any(|u| u.username == form.username) {
            return Err(ValidationError::Duplicate { field: "username" });
        }
        if others.iter().any(|u| u.email == form.email) {
            return Err(ValidationError::Duplicate { field: "email" });
        }
        Ok(())
    }
}
