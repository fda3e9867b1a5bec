//! User administration: registration, login, the module registry, and
//! permission grants.

use anyhow::{bail, Result};
use log::{info, warn};

use shared::{
    CreateModuleRequest, GrantPermissionRequest, LoginRequest, ModuleEntry, PermissionEntry,
    RegisterUserRequest, UserSession,
};

use crate::domain::session::SessionService;
use crate::storage::csv::{CsvConnection, UserRepository, UserRow};

#[derive(Clone)]
pub struct UserService {
    repository: UserRepository,
    session_service: SessionService,
}

impl UserService {
    pub fn new(connection: CsvConnection, session_service: SessionService) -> Self {
        Self {
            repository: UserRepository::new(connection),
            session_service,
        }
    }

    /// Password policy enforced at registration: at least 8 characters,
    /// one digit, one special character.
    fn validate_password(password: &str) -> Result<()> {
        if password.len() < 8 {
            bail!("Password must be at least 8 characters");
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            bail!("Password must contain at least 1 number");
        }
        if !password.chars().any(|c| !c.is_alphanumeric()) {
            bail!("Password must contain at least 1 special character");
        }
        Ok(())
    }

    pub fn register(&self, request: RegisterUserRequest) -> Result<String> {
        let user_name = request.user_name.trim().to_string();
        if user_name.is_empty() {
            bail!("Username is required");
        }
        if user_name.len() > 50 {
            bail!("Username too long");
        }
        Self::validate_password(&request.user_pwd)?;

        if self.repository.find_by_name(&user_name)?.is_some() {
            bail!("User \"{}\" already exists", user_name);
        }

        let user_code = format!("U{:03}", self.repository.list_users()?.len() + 1);
        self.repository.store_user(UserRow {
            user_code: user_code.clone(),
            user_name: user_name.clone(),
            user_pwd: request.user_pwd,
            role: request.role.trim().to_string(),
            created_by: user_name.clone(),
        })?;

        info!("Registered user {} ({})", user_name, user_code);
        Ok(user_code)
    }

    /// Verify credentials and open a session carrying the user's resolved
    /// route permissions.
    pub fn login(&self, request: LoginRequest) -> Result<UserSession> {
        let user = match self.repository.find_by_name(&request.user_name)? {
            Some(user) if user.user_pwd == request.user_pwd => user,
            _ => {
                warn!("Failed login attempt for \"{}\"", request.user_name.trim());
                bail!("Invalid username or password");
            }
        };

        let grants = self.repository.permissions_for_user(&user.user_code)?;
        self.session_service
            .open_session(&user.user_code, &user.user_name, &user.role, &grants)
    }

    pub fn logout(&self, token: &str) -> Result<()> {
        self.session_service.close_session(token)
    }

    // ===== Module registry =====

    pub fn list_modules(&self) -> Result<Vec<ModuleEntry>> {
        self.repository.list_modules()
    }

    pub fn create_module(&self, request: CreateModuleRequest) -> Result<ModuleEntry> {
        let mod_name = request.mod_name.trim().to_lowercase().replace(' ', "_");
        let sub_mod_name = request.sub_mod_name.trim().to_lowercase().replace(' ', "_");
        if mod_name.is_empty() || sub_mod_name.is_empty() {
            bail!("Module and sub-module names are required");
        }
        let valid = |name: &str| name.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid(&mod_name) || !valid(&sub_mod_name) {
            bail!("Module names may only contain letters, spaces and underscores");
        }

        let existing = self.repository.list_modules()?;
        if existing
            .iter()
            .any(|m| m.mod_name == mod_name && m.sub_mod_name == sub_mod_name)
        {
            bail!("Module \"{}:{}\" already exists", mod_name, sub_mod_name);
        }

        let module = ModuleEntry {
            module_id: mod_name.clone(),
            mod_name,
            sub_mod_name,
            created_by: request.created_by,
        };
        self.repository.store_module(module.clone())?;
        info!("Registered module {}:{}", module.mod_name, module.sub_mod_name);

        Ok(module)
    }

    // ===== Permission grants =====

    pub fn permissions_for_user(&self, user_code: &str) -> Result<Vec<PermissionEntry>> {
        self.repository.permissions_for_user(user_code)
    }

    pub fn grant_permission(&self, request: GrantPermissionRequest) -> Result<PermissionEntry> {
        let users = self.repository.list_users()?;
        if !users.iter().any(|u| u.user_code == request.user_code) {
            bail!("Unknown user code \"{}\"", request.user_code);
        }

        let existing = self.repository.permissions_for_user(&request.user_code)?;
        if existing
            .iter()
            .any(|p| p.module_id == request.module_id && p.sub_mod_id == request.sub_mod_id)
        {
            bail!("Permission already granted");
        }

        let permission = PermissionEntry {
            user_code: request.user_code,
            module_id: request.module_id.trim().to_lowercase(),
            sub_mod_id: request.sub_mod_id.trim().to_lowercase(),
        };
        self.repository.store_permission(permission.clone())?;
        info!(
            "Granted {}:{} to {}",
            permission.module_id, permission.sub_mod_id, permission.user_code
        );

        Ok(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    use crate::domain::session::{InMemorySessionStore, SessionService};

    fn setup() -> UserService {
        let temp_dir = tempdir().unwrap();
        let conn = CsvConnection::new(temp_dir.path().to_path_buf()).unwrap();
        let _ = temp_dir.keep(); // persist temp dir for the test's lifetime
        let sessions = SessionService::new(Arc::new(InMemorySessionStore::new()));
        UserService::new(conn, sessions)
    }

    fn register(service: &UserService, name: &str, pwd: &str) -> String {
        service
            .register(RegisterUserRequest {
                user_name: name.to_string(),
                user_pwd: pwd.to_string(),
                role: "staff".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_password_policy() {
        let service = setup();
        let attempt = |pwd: &str| {
            service.register(RegisterUserRequest {
                user_name: "someone".to_string(),
                user_pwd: pwd.to_string(),
                role: String::new(),
            })
        };

        assert!(attempt("sh0rt!").is_err());
        assert!(attempt("nodigits!!").is_err());
        assert!(attempt("nospecial1").is_err());
        assert!(attempt("g00d#pass").is_ok());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let service = setup();
        register(&service, "Kitchen Admin", "g00d#pass");

        let err = service
            .register(RegisterUserRequest {
                user_name: "kitchen admin".to_string(),
                user_pwd: "an0ther#pass".to_string(),
                role: String::new(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_login_resolves_granted_routes() {
        let service = setup();
        let user_code = register(&service, "Kitchen Admin", "g00d#pass");
        service
            .grant_permission(GrantPermissionRequest {
                user_code: user_code.clone(),
                module_id: "master".to_string(),
                sub_mod_id: "item".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();

        let session = service
            .login(LoginRequest {
                user_name: "Kitchen Admin".to_string(),
                user_pwd: "g00d#pass".to_string(),
            })
            .unwrap();

        assert_eq!(session.user_code, user_code);
        assert!(session.allowed_routes.contains(&"/dashboard/item".to_string()));

        assert!(service
            .login(LoginRequest {
                user_name: "Kitchen Admin".to_string(),
                user_pwd: "wrong".to_string(),
            })
            .is_err());
    }

    #[test]
    fn test_module_name_normalization_and_validation() {
        let service = setup();
        let module = service
            .create_module(CreateModuleRequest {
                mod_name: "Delivery Plan".to_string(),
                sub_mod_name: "Schedule".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        assert_eq!(module.mod_name, "delivery_plan");
        assert_eq!(module.sub_mod_name, "schedule");

        assert!(service
            .create_module(CreateModuleRequest {
                mod_name: "Bad-Name!".to_string(),
                sub_mod_name: "x".to_string(),
                created_by: "admin".to_string(),
            })
            .is_err());
    }

    #[test]
    fn test_duplicate_grant_rejected() {
        let service = setup();
        let user_code = register(&service, "Staff One", "g00d#pass");

        let request = GrantPermissionRequest {
            user_code,
            module_id: "master".to_string(),
            sub_mod_id: "unit".to_string(),
            created_by: "admin".to_string(),
        };
        service.grant_permission(request.clone()).unwrap();
        assert!(service.grant_permission(request).is_err());

        assert!(service
            .grant_permission(GrantPermissionRequest {
                user_code: "U999".to_string(),
                module_id: "master".to_string(),
                sub_mod_id: "unit".to_string(),
                created_by: "admin".to_string(),
            })
            .is_err());
    }
}
