//! Deterministic mock collections the console starts with.

use crate::model::{
    Capability, Permission, PermissionModule, PermissionStatus, PermissionType, Role, RoleStatus,
    User, UserRole, UserStatus,
};
use chrono::{NaiveDate, NaiveDateTime};

fn january(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .unwrap_or_default()
}

/// Day of month for the generated entries: `(i % 28) + 1`.
fn day_for(i: u64) -> u32 {
    (i % 28) as u32 + 1
}

pub fn users() -> Vec<User> {
    let fixed = [
        (1, "admin", UserRole::Admin, UserStatus::Active),
        (2, "editor001", UserRole::Editor, UserStatus::Active),
        (3, "user001", UserRole::User, UserStatus::Inactive),
        (4, "user002", UserRole::User, UserStatus::Active),
        (5, "editor002", UserRole::Editor, UserStatus::Banned),
    ];
    let mut out: Vec<User> = fixed
        .into_iter()
        .map(|(id, name, role, status)| User {
            id,
            username: name.to_string(),
            email: format!("{name}@example.com"),
            phone: format!("1380013800{id}"),
            role,
            status,
            created_at: january(id as u32),
            updated_at: january(id as u32),
        })
        .collect();

    const ROLES: [UserRole; 3] = [UserRole::Admin, UserRole::User, UserRole::Editor];
    const STATUSES: [UserStatus; 3] = [UserStatus::Active, UserStatus::Inactive, UserStatus::Banned];
    for i in 6..=50u64 {
        let name = format!("user{i:03}");
        out.push(User {
            id: i,
            email: format!("{name}@example.com"),
            username: name,
            phone: format!("1380013{i:04}"),
            role: ROLES[(i % 3) as usize],
            status: STATUSES[(i % 3) as usize],
            created_at: january(day_for(i)),
            updated_at: january(day_for(i)),
        });
    }
    out
}

pub fn roles() -> Vec<Role> {
    use Capability::*;
    let fixed: [(u64, &str, &str, Vec<Capability>, RoleStatus, u32); 5] = [
        (
            1,
            "Super Admin",
            "Holds every permission in the system",
            Capability::ALL.to_vec(),
            RoleStatus::Active,
            1,
        ),
        (
            2,
            "Content Editor",
            "Edits and publishes content",
            vec![ContentEdit, ContentView, UserView],
            RoleStatus::Active,
            5,
        ),
        (
            3,
            "Member",
            "Regular user who can only read content",
            vec![ContentView, UserView],
            RoleStatus::Active,
            15,
        ),
        (
            4,
            "Guest",
            "Can only see public content",
            vec![ContentView],
            RoleStatus::Inactive,
            0,
        ),
        (
            5,
            "Reviewer",
            "Reviews submitted content",
            vec![ContentView, ContentEdit, UserView, DataExport],
            RoleStatus::Active,
            3,
        ),
    ];
    let mut out: Vec<Role> = fixed
        .into_iter()
        .map(|(id, name, description, permissions, status, user_count)| Role {
            id,
            name: name.to_string(),
            description: Some(description.to_string()),
            permissions,
            status,
            created_at: january(id as u32),
            updated_at: january(id as u32),
            user_count,
        })
        .collect();

    let sets: [&[Capability]; 5] = [
        &[ContentView],
        &[ContentView, UserView],
        &[ContentEdit, ContentView, UserView],
        &[UserManage, UserView, RoleManage],
        &[ContentEdit, ContentView, DataExport, UserView],
    ];
    for i in 6..=20u64 {
        out.push(Role {
            id: i,
            name: format!("Role {i:03}"),
            description: Some(format!("Description of role {i}")),
            permissions: sets[(i % 5) as usize].to_vec(),
            status: if i % 2 == 0 {
                RoleStatus::Active
            } else {
                RoleStatus::Inactive
            },
            created_at: january(day_for(i)),
            updated_at: january(day_for(i)),
            user_count: ((i * 7) % 20) as u32,
        });
    }
    out
}

pub fn permissions() -> Vec<Permission> {
    use PermissionModule as M;
    use PermissionType as T;
    let fixed = [
        (1, "User view", "user:view", "View users and the user list", T::Button, M::UserManage, true),
        (2, "User create", "user:create", "Create user accounts", T::Button, M::UserManage, true),
        (3, "User edit", "user:edit", "Edit basic user details", T::Button, M::UserManage, true),
        (4, "User delete", "user:delete", "Delete user accounts", T::Button, M::UserManage, true),
        (5, "Role view", "role:view", "View roles and the role list", T::Button, M::RoleManage, true),
        (6, "Role menu", "role:menu", "Access to the role management menu", T::Menu, M::RoleManage, true),
        (7, "System config", "system:config", "System configuration API", T::Api, M::SystemConfig, true),
        (8, "Data export", "data:export", "Data export API", T::Api, M::DataExport, true),
        (9, "Content menu", "content:menu", "Access to the content management menu", T::Menu, M::ContentManage, false),
        (10, "Log view", "log:view", "View the operation log", T::Button, M::LogView, true),
    ];
    let mut out: Vec<Permission> = fixed
        .into_iter()
        .map(|(id, name, code, description, kind, module, active)| Permission {
            id,
            name: name.to_string(),
            code: code.to_string(),
            description: Some(description.to_string()),
            kind,
            module,
            status: if active {
                PermissionStatus::Active
            } else {
                PermissionStatus::Inactive
            },
            created_at: january(id as u32),
            updated_at: january(id as u32),
        })
        .collect();

    const TYPES: [PermissionType; 3] = [T::Menu, T::Button, T::Api];
    for i in 11..=30u64 {
        let module = M::ALL[(i % 6) as usize];
        out.push(Permission {
            id: i,
            name: format!("{}_{i}_permission", module.as_str()),
            code: format!("{}:action{i}", module.as_str()),
            description: Some(format!("Description of permission {i}")),
            kind: TYPES[(i % 3) as usize],
            module,
            status: if i % 2 == 0 {
                PermissionStatus::Active
            } else {
                PermissionStatus::Inactive
            },
            created_at: january(day_for(i)),
            updated_at: january(day_for(i)),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seed_sizes() {
        assert_eq!(users().len(), 50);
        assert_eq!(roles().len(), 20);
        assert_eq!(permissions().len(), 30);
    }

    #[test]
    fn sixteen_admins() {
        assert_eq!(
            users().iter().filter(|u| u.role == UserRole::Admin).count(),
            16
        );
    }

    #[test]
    fn generated_user_fields() {
        let u = users().into_iter().find(|u| u.id == 29).expect("user 29");
        assert_eq!(u.username, "user029");
        assert_eq!(u.phone, "13800130029");
        assert_eq!(u.role, UserRole::Editor);
        assert_eq!(u.status, UserStatus::Banned);
        assert_eq!(u.created_at.format("%Y-%m-%d").to_string(), "2024-01-02");
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<u64> = users().iter().map(|u| u.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 50);
        let mut codes: Vec<String> = permissions().into_iter().map(|p| p.code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 30);
    }
}
