//! Entities held by the admin console's repositories.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamps travel as `YYYY-MM-DD HH:MM:SS`.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}

/// Common shape the in-memory repository needs.
pub trait Entity: Clone + Send + 'static {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

macro_rules! entity {
    ($ty:ty) => {
        impl Entity for $ty {
            fn id(&self) -> u64 {
                self.id
            }
            fn set_id(&mut self, id: u64) {
                self.id = id;
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Editor,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Banned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}
entity!(User);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    Active,
    Inactive,
}

/// Capability a role grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "user:manage")]
    UserManage,
    #[serde(rename = "user:view")]
    UserView,
    #[serde(rename = "role:manage")]
    RoleManage,
    #[serde(rename = "content:edit")]
    ContentEdit,
    #[serde(rename = "content:view")]
    ContentView,
    #[serde(rename = "system:config")]
    SystemConfig,
    #[serde(rename = "data:export")]
    DataExport,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::UserManage,
        Capability::UserView,
        Capability::RoleManage,
        Capability::ContentEdit,
        Capability::ContentView,
        Capability::SystemConfig,
        Capability::DataExport,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Capability::UserManage => "user:manage",
            Capability::UserView => "user:view",
            Capability::RoleManage => "role:manage",
            Capability::ContentEdit => "content:edit",
            Capability::ContentView => "content:view",
            Capability::SystemConfig => "system:config",
            Capability::DataExport => "data:export",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Capability::UserManage => "User management",
            Capability::UserView => "User view",
            Capability::RoleManage => "Role management",
            Capability::ContentEdit => "Content editing",
            Capability::ContentView => "Content view",
            Capability::SystemConfig => "System configuration",
            Capability::DataExport => "Data export",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<Capability>,
    pub status: RoleStatus,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
    pub user_count: u32,
}
entity!(Role);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionType {
    Menu,
    Button,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionModule {
    UserManage,
    RoleManage,
    SystemConfig,
    ContentManage,
    DataExport,
    LogView,
}

impl PermissionModule {
    pub const ALL: [PermissionModule; 6] = [
        PermissionModule::UserManage,
        PermissionModule::RoleManage,
        PermissionModule::SystemConfig,
        PermissionModule::ContentManage,
        PermissionModule::DataExport,
        PermissionModule::LogView,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionModule::UserManage => "user_manage",
            PermissionModule::RoleManage => "role_manage",
            PermissionModule::SystemConfig => "system_config",
            PermissionModule::ContentManage => "content_manage",
            PermissionModule::DataExport => "data_export",
            PermissionModule::LogView => "log_view",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: u64,
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PermissionType,
    pub module: PermissionModule,
    pub status: PermissionStatus,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}
entity!(Permission);
