//! User management service — application-layer orchestration
//!
//! All identity business logic lives here: login with brute-force lockout,
//! user CRUD, password changes and resets. HTTP handlers are thin wrappers
//! that delegate to this service. Every mutating operation appends an
//! audit entry; audit failures are logged and never fail the operation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, RepositoryProvider, UpdateUserDto, User,
    UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::PaginatedResult;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Per-username failed-login tracking.
#[derive(Debug)]
struct FailedLogins {
    count: u32,
    locked_until: Option<Instant>,
}

/// User service — orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    security: SecurityConfig,
    /// Username that can never be deleted (the bootstrap admin).
    protected_username: String,
    failed_logins: DashMap<String, FailedLogins>,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        security: SecurityConfig,
        protected_username: impl Into<String>,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            security,
            protected_username: protected_username.into(),
            failed_logins: DashMap::new(),
        }
    }

    async fn audit(&self, user_id: Option<&str>, action: &str, details: Option<&str>) {
        if let Err(e) = self.repos.audit_log().record(user_id, action, details).await {
            warn!(action, "Failed to write audit entry: {}", e);
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username + password and return a JWT.
    ///
    /// After `max_login_attempts` consecutive failures the username is
    /// locked for `lockout_seconds`; every failed attempt also incurs a
    /// short delay.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        if let Some(state) = self.failed_logins.get(username) {
            if let Some(until) = state.locked_until {
                let now = Instant::now();
                if now < until {
                    let remaining = (until - now).as_secs().max(1);
                    return Err(DomainError::LoginLocked(remaining));
                }
            }
        }

        let found = self.repos.users().get_user_by_username(username).await?;

        let user = match found {
            Some(user)
                if user.is_active
                    && verify_password(password, &user.password_hash).unwrap_or(false) =>
            {
                user
            }
            _ => {
                self.note_failed_attempt(username);
                // Slows brute forcing; configurable so tests can zero it.
                tokio::time::sleep(Duration::from_millis(self.security.failed_login_delay_ms))
                    .await;
                return Err(DomainError::Unauthorized("Invalid credentials".into()));
            }
        };

        self.failed_logins.remove(username);

        if let Err(e) = self.repos.users().touch_last_login(&user.id).await {
            warn!("Failed to update last login for {}: {}", user.username, e);
        }

        let token = create_token(&user.id, &user.username, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        self.audit(Some(&user.id), "login", None).await;
        info!(username = %user.username, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    fn note_failed_attempt(&self, username: &str) {
        let mut entry = self
            .failed_logins
            .entry(username.to_string())
            .or_insert(FailedLogins {
                count: 0,
                locked_until: None,
            });
        entry.count += 1;
        if entry.count >= self.security.max_login_attempts {
            entry.locked_until =
                Some(Instant::now() + Duration::from_secs(self.security.lockout_seconds));
            entry.count = 0;
            warn!(username, "Login locked after repeated failures");
        }
    }

    /// Record a logout. Token invalidation is client-side.
    pub async fn logout(&self, user_id: &str) {
        self.audit(Some(user_id), "logout", None).await;
    }

    // ── User management ─────────────────────────────────────────

    pub async fn create_user(&self, actor_id: &str, dto: CreateUserDto) -> DomainResult<User> {
        self.validate_username(&dto.username)?;
        self.validate_password(&dto.password)?;
        if dto.full_name.trim().is_empty() {
            return Err(DomainError::Validation("Full name is required".into()));
        }

        if self
            .repos
            .users()
            .get_user_by_username(&dto.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict("Username already exists".into()));
        }

        let username = dto.username.clone();
        self.repos.users().create_user(dto).await?;

        let user = self
            .repos
            .users()
            .get_user_by_username(&username)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "username",
                value: username.clone(),
            })?;

        self.audit(
            Some(actor_id),
            "add_user",
            Some(&format!("Added user {}", username)),
        )
        .await;

        Ok(user)
    }

    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list_users(dto).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.repos.users().get_user_by_id(id).await
    }

    pub async fn update_user(
        &self,
        actor_id: &str,
        id: &str,
        dto: UpdateUserDto,
    ) -> DomainResult<Option<User>> {
        let updated = self.repos.users().update_user(id, dto).await?;

        if let Some(user) = &updated {
            self.audit(
                Some(actor_id),
                "edit_user",
                Some(&format!("Updated user {}", user.username)),
            )
            .await;
        }

        Ok(updated)
    }

    pub async fn delete_user(&self, actor_id: &str, id: &str) -> DomainResult<()> {
        let user = self
            .repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })?;

        if user.username == self.protected_username {
            return Err(DomainError::Forbidden(
                "The default admin account cannot be deleted".into(),
            ));
        }

        self.repos.users().delete_user(id).await?;

        self.audit(
            Some(actor_id),
            "delete_user",
            Some(&format!("Deleted user {}", user.username)),
        )
        .await;

        Ok(())
    }

    // ── Passwords ───────────────────────────────────────────────

    /// Admin-driven reset of another user's password.
    pub async fn reset_password(
        &self,
        actor_id: &str,
        target_id: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        self.validate_password(new_password)?;

        let target = self
            .repos
            .users()
            .get_user_by_id(target_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: target_id.to_string(),
            })?;

        let hash = hash_password(new_password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
        self.repos
            .users()
            .update_user_password(target_id, &hash)
            .await?;

        self.audit(
            Some(actor_id),
            "reset_password",
            Some(&format!("Reset password for {}", target.username)),
        )
        .await;

        Ok(())
    }

    /// Self-service password change, requires the current password.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        self.validate_password(new_password)?;

        let user = self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })?;

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized(
                "Current password is incorrect".into(),
            ));
        }

        let hash = hash_password(new_password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
        self.repos
            .users()
            .update_user_password(user_id, &hash)
            .await?;

        self.audit(Some(user_id), "change_password", None).await;

        Ok(())
    }

    // ── Bootstrap ───────────────────────────────────────────────

    /// Create the default admin account when the users table is empty.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> DomainResult<bool> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(false);
        }

        info!("Creating default admin user '{}'", username);
        self.repos
            .users()
            .create_user(CreateUserDto {
                username: username.to_string(),
                password: password.to_string(),
                full_name: full_name.to_string(),
                role: Some(UserRole::Admin),
            })
            .await?;

        Ok(true)
    }

    // ── Validation helpers ──────────────────────────────────────

    fn validate_username(&self, username: &str) -> DomainResult<()> {
        if username.len() < 3 || username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> DomainResult<()> {
        if password.len() < self.security.min_password_length {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;

    async fn setup() -> UserService {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let security = SecurityConfig {
            failed_login_delay_ms: 0,
            ..SecurityConfig::default()
        };
        UserService::new(repos, JwtConfig::default(), security, "admin")
    }

    async fn setup_with_admin() -> UserService {
        let service = setup().await;
        service
            .bootstrap_admin("admin", "admin123", "Administrator")
            .await
            .unwrap();
        service
    }

    async fn admin_id(service: &UserService) -> String {
        service
            .repos
            .users()
            .get_user_by_username("admin")
            .await
            .unwrap()
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn bootstrap_creates_admin_once() {
        let service = setup().await;
        assert!(service
            .bootstrap_admin("admin", "admin123", "Administrator")
            .await
            .unwrap());
        // Second call is a no-op because users exist now.
        assert!(!service
            .bootstrap_admin("admin", "admin123", "Administrator")
            .await
            .unwrap());

        let admin = service
            .repos
            .users()
            .get_user_by_username("admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert!(admin.is_active);
    }

    #[tokio::test]
    async fn login_succeeds_with_valid_credentials() {
        let service = setup_with_admin().await;
        let auth = service.login("admin", "admin123").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.user.username, "admin");
        assert!(!auth.token.is_empty());
    }

    #[tokio::test]
    async fn login_rejects_bad_password() {
        let service = setup_with_admin().await;
        let err = service.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_locks_after_three_failures() {
        let service = setup_with_admin().await;
        for _ in 0..3 {
            let err = service.login("admin", "wrong").await.unwrap_err();
            assert!(matches!(err, DomainError::Unauthorized(_)));
        }
        // Fourth attempt is refused outright, even with the right password.
        let err = service.login("admin", "admin123").await.unwrap_err();
        assert!(matches!(err, DomainError::LoginLocked(_)));
    }

    #[tokio::test]
    async fn successful_login_clears_failure_count() {
        let service = setup_with_admin().await;
        for _ in 0..2 {
            let _ = service.login("admin", "wrong").await;
        }
        service.login("admin", "admin123").await.unwrap();
        // Counter reset: two more failures are still below the limit.
        for _ in 0..2 {
            let _ = service.login("admin", "wrong").await;
        }
        service.login("admin", "admin123").await.unwrap();
    }

    #[tokio::test]
    async fn create_user_rejects_duplicates_and_short_passwords() {
        let service = setup_with_admin().await;
        let actor = admin_id(&service).await;

        let err = service
            .create_user(
                &actor,
                CreateUserDto {
                    username: "jdoe".into(),
                    password: "short".into(),
                    full_name: "J. Doe".into(),
                    role: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .create_user(
                &actor,
                CreateUserDto {
                    username: "admin".into(),
                    password: "password123".into(),
                    full_name: "Impostor".into(),
                    role: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn listing_far_beyond_last_page_returns_empty() {
        let service = setup_with_admin().await;
        let result = service
            .list_users(GetUserDto {
                search: None,
                role: None,
                page: Some(u32::MAX),
                page_size: Some(100),
                sort_by: None,
            })
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn default_admin_cannot_be_deleted() {
        let service = setup_with_admin().await;
        let actor = admin_id(&service).await;
        let err = service.delete_user(&actor, &actor).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let service = setup_with_admin().await;
        let id = admin_id(&service).await;

        let err = service
            .change_password(&id, "wrong", "newpassword1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        service
            .change_password(&id, "admin123", "newpassword1")
            .await
            .unwrap();
        service.login("admin", "newpassword1").await.unwrap();
    }
}
