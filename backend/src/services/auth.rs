//! Authentication service for portal login and account management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::Role;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub role: Role,
}

/// Input for creating a portal account
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Portal account as returned to admins
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

/// User row from the database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Validate credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("bcrypt verify: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = Role::parse(&user.role)
            .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("unknown role {}", user.role)))?;

        let token = self.issue_token(user.id, &user.username, role)?;

        Ok(AuthTokens {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            role,
        })
    }

    /// Create a portal account (admin operation)
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<UserAccount> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AppError::validation("username", "Username is required"));
        }
        if input.password.len() < 6 {
            return Err(AppError::validation(
                "password",
                "Password must be at least 6 characters",
            ));
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;
        if exists {
            return Err(AppError::DuplicateEntry(format!("User '{}'", username)));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("bcrypt hash: {}", e)))?;

        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, role
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(account)
    }

    /// Seed the default admin account on an empty users table
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        if count > 0 {
            return Ok(());
        }

        let password_hash = hash("admin123", DEFAULT_COST)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("bcrypt hash: {}", e)))?;

        sqlx::query(
            "INSERT INTO users (username, password_hash, role) VALUES ('admin', $1, 'admin')
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(&password_hash)
        .execute(&self.db)
        .await?;

        tracing::warn!("Seeded default admin account; change its password");
        Ok(())
    }

    fn issue_token(&self, user_id: Uuid, username: &str, role: Role) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("token encode: {}", e)))
    }
}
