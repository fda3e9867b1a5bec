//! CSV repository for user accounts, the module registry, and permission
//! grants. Passwords never leave this layer; the service maps accounts to
//! session DTOs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shared::{ModuleEntry, PermissionEntry};

use super::connection::CsvConnection;

const USERS: &str = "users";
const MODULES: &str = "modules";
const PERMISSIONS: &str = "permissions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub user_code: String,
    pub user_name: String,
    pub user_pwd: String,
    pub role: String,
    pub created_by: String,
}

#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.connection.read_table(USERS)
    }

    pub fn store_user(&self, user: UserRow) -> Result<()> {
        self.connection.append_row(USERS, user)
    }

    pub fn find_by_name(&self, user_name: &str) -> Result<Option<UserRow>> {
        let users = self.list_users()?;
        Ok(users
            .into_iter()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name.trim())))
    }

    pub fn list_modules(&self) -> Result<Vec<ModuleEntry>> {
        self.connection.read_table(MODULES)
    }

    pub fn store_module(&self, module: ModuleEntry) -> Result<()> {
        self.connection.append_row(MODULES, module)
    }

    pub fn list_permissions(&self) -> Result<Vec<PermissionEntry>> {
        self.connection.read_table(PERMISSIONS)
    }

    pub fn store_permission(&self, permission: PermissionEntry) -> Result<()> {
        self.connection.append_row(PERMISSIONS, permission)
    }

    pub fn permissions_for_user(&self, user_code: &str) -> Result<Vec<PermissionEntry>> {
        let permissions = self.list_permissions()?;
        Ok(permissions
            .into_iter()
            .filter(|p| p.user_code == user_code)
            .collect())
    }
}
