//! User service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use artlog_common::{error::codes, AppError, AppResult, IdGenerator, TokenIssuer};
use artlog_db::{
    entities::{user, user_role},
    repositories::{RoleRepository, UserRepository},
};
use sea_orm::Set;
use tracing::info;

use crate::domain::{validate_nickname, validate_password, SignupDraft};

/// Role granted to every account at creation.
pub const ROLE_USER: &str = "ROLE_USER";

/// A signed-in account with its access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The account row.
    pub user: user::Model,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// User service for accounts and credentials.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    role_repo: RoleRepository,
    token_issuer: TokenIssuer,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        role_repo: RoleRepository,
        token_issuer: TokenIssuer,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            token_issuer,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a local account.
    ///
    /// Quit accounts keep their email and nickname reserved, so duplicates
    /// are checked against every row, not just active ones.
    pub async fn signup(&self, draft: SignupDraft) -> AppResult<AuthenticatedUser> {
        if self.user_repo.email_exists(&draft.email).await? {
            return Err(AppError::already_exists(
                codes::DUPLICATE_EMAIL,
                "Email is already registered",
            ));
        }
        if self.user_repo.nickname_exists(&draft.nickname).await? {
            return Err(AppError::already_exists(
                codes::DUPLICATE_NICKNAME,
                "Nickname is already taken",
            ));
        }

        let password_hash = hash_password(&draft.password)?;
        let user_id = self.id_gen.generate();

        let user = self
            .user_repo
            .create(user::ActiveModel {
                id: Set(user_id.clone()),
                email: Set(draft.email),
                nickname: Set(draft.nickname),
                profile_image: Set(None),
                password_hash: Set(Some(password_hash)),
                oauth_provider: Set(None),
                is_quit: Set(false),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        self.grant_default_role(&user.id).await?;

        info!(user_id = %user.id, "User signed up");

        let token = self.token_issuer.issue(&user.id)?;
        Ok(AuthenticatedUser { user, token })
    }

    /// Sign in with email and password.
    ///
    /// Any credential mismatch, including an OAuth-only account with no
    /// password hash, answers Unauthorized without detail.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = user.password_hash.clone().ok_or(AppError::Unauthorized)?;
        if !verify_password(password, &password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.token_issuer.issue(&user.id)?;
        Ok(AuthenticatedUser { user, token })
    }

    /// Sign in through an OAuth provider, provisioning the account on first
    /// contact. Provisioned accounts carry no password hash.
    pub async fn oauth_login(
        &self,
        provider: &str,
        email: &str,
        nickname: &str,
    ) -> AppResult<AuthenticatedUser> {
        if let Some(user) = self.user_repo.find_by_email(email).await? {
            let token = self.token_issuer.issue(&user.id)?;
            return Ok(AuthenticatedUser { user, token });
        }

        validate_nickname(nickname)?;
        if self.user_repo.nickname_exists(nickname).await? {
            return Err(AppError::already_exists(
                codes::DUPLICATE_NICKNAME,
                "Nickname is already taken",
            ));
        }

        let user_id = self.id_gen.generate();
        let user = self
            .user_repo
            .create(user::ActiveModel {
                id: Set(user_id.clone()),
                email: Set(email.to_string()),
                nickname: Set(nickname.to_string()),
                profile_image: Set(None),
                password_hash: Set(None),
                oauth_provider: Set(Some(provider.to_string())),
                is_quit: Set(false),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        self.grant_default_role(&user.id).await?;

        info!(user_id = %user.id, provider, "User provisioned via oauth");

        let token = self.token_issuer.issue(&user.id)?;
        Ok(AuthenticatedUser { user, token })
    }

    /// Resolve a bearer token into its account. Used by the auth middleware.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.token_issuer.verify(token)?;
        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get an active user by ID.
    pub async fn get(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Role names granted to the account.
    pub async fn roles_of(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.role_repo.names_for_user(user_id).await
    }

    /// Change the display nickname.
    pub async fn change_nickname(&self, user_id: &str, nickname: &str) -> AppResult<user::Model> {
        validate_nickname(nickname)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if user.nickname != nickname && self.user_repo.nickname_exists(nickname).await? {
            return Err(AppError::already_exists(
                codes::DUPLICATE_NICKNAME,
                "Nickname is already taken",
            ));
        }

        self.user_repo
            .update(user::ActiveModel {
                id: Set(user_id.to_string()),
                nickname: Set(nickname.to_string()),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await
    }

    /// Change the profile image URL.
    pub async fn change_profile_image(
        &self,
        user_id: &str,
        profile_image: &str,
    ) -> AppResult<user::Model> {
        crate::domain::exhibition::check_http_url(profile_image)?;

        self.user_repo.get_by_id(user_id).await?;
        self.user_repo
            .update(user::ActiveModel {
                id: Set(user_id.to_string()),
                profile_image: Set(Some(profile_image.to_string())),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await
    }

    /// Change the password, re-verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        validate_password(new_password)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let password_hash = user.password_hash.ok_or(AppError::Unauthorized)?;
        if !verify_password(current_password, &password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let new_hash = hash_password(new_password)?;
        self.user_repo
            .update(user::ActiveModel {
                id: Set(user_id.to_string()),
                password_hash: Set(Some(new_hash)),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    /// Soft-quit the account. The row stays so reviews and comments keep
    /// their author link.
    pub async fn quit(&self, user_id: &str) -> AppResult<()> {
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo
            .update(user::ActiveModel {
                id: Set(user_id.to_string()),
                is_quit: Set(true),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await?;

        info!(user_id, "User quit");
        Ok(())
    }

    async fn grant_default_role(&self, user_id: &str) -> AppResult<()> {
        let role = match self.role_repo.find_by_name(ROLE_USER).await? {
            Some(role) => role,
            None => {
                self.role_repo
                    .create(artlog_db::entities::role::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        name: Set(ROLE_USER.to_string()),
                    })
                    .await?
            }
        };

        self.role_repo
            .grant(user_role::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                role_id: Set(role.id),
            })
            .await?;
        Ok(())
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
