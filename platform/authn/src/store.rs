use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use entity::{app_user, revoked_token};
use rand_core::OsRng;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::{info, instrument};

use crate::error::{AuthnError, AuthnResult};
use crate::token::{AuthConfig, Claims, decode_token, issue_token};

const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: app_user::Model,
}

/// The caller behind a validated, unrevoked bearer token.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: i32,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

#[instrument(skip(db, password))]
pub async fn register<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> AuthnResult<app_user::Model> {
    let username = normalize_username(username)?;
    if password.is_empty() {
        return Err(AuthnError::validation("password", "password is required"));
    }

    let taken = app_user::Entity::find()
        .filter(app_user::Column::Username.eq(username.as_str()))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(username_taken());
    }

    let model = app_user::ActiveModel {
        username: Set(username),
        password_hash: Set(hash_password(password)?),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => username_taken(),
        _ => AuthnError::Database(err),
    })?;

    info!(user_id = model.id, "user registered");
    Ok(model)
}

#[instrument(skip(db, config, password))]
pub async fn login<C: ConnectionTrait>(
    db: &C,
    config: &AuthConfig,
    username: &str,
    password: &str,
) -> AuthnResult<LoginOutcome> {
    let user = app_user::Entity::find()
        .filter(app_user::Column::Username.eq(username.trim()))
        .one(db)
        .await?
        .ok_or_else(invalid_credentials)?;

    let parsed_hash =
        PasswordHash::new(&user.password_hash).map_err(|err| AuthnError::Hash(err.to_string()))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(invalid_credentials());
    }

    let token = issue_token(user.id, config)?;
    info!(user_id = user.id, "user logged in");
    Ok(LoginOutcome { token, user })
}

/// Revoke the presented token. Revoking an already revoked token is a no-op.
#[instrument(skip_all, fields(user_id = principal.user_id))]
pub async fn logout<C: ConnectionTrait>(db: &C, principal: &Principal) -> AuthnResult<()> {
    let entry = revoked_token::ActiveModel {
        jti: Set(principal.jti.clone()),
        user_id: Set(principal.user_id),
        revoked_at: Set(Utc::now().into()),
        expires_at: Set(principal.expires_at.into()),
    };
    revoked_token::Entity::insert(entry)
        .on_conflict(
            OnConflict::column(revoked_token::Column::Jti)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let pruned = prune_expired(db).await?;
    info!(pruned, "token revoked");
    Ok(())
}

/// Validate a bearer token: signature, expiry, revocation list and that the
/// subject still exists.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    config: &AuthConfig,
    token: &str,
) -> AuthnResult<Principal> {
    let claims: Claims =
        decode_token(token, config).map_err(|_| AuthnError::unauthorized("invalid or expired token"))?;

    let revoked = revoked_token::Entity::find_by_id(claims.jti.clone())
        .one(db)
        .await?
        .is_some();
    if revoked {
        return Err(AuthnError::unauthorized("token has been revoked"));
    }

    let user = find_user(db, claims.sub)
        .await?
        .ok_or_else(|| AuthnError::unauthorized("unknown user"))?;

    Ok(Principal {
        user_id: user.id,
        expires_at: claims.expires_at(),
        jti: claims.jti,
    })
}

pub async fn find_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> AuthnResult<Option<app_user::Model>> {
    Ok(app_user::Entity::find_by_id(user_id).one(db).await?)
}

/// Drop revocation entries whose token has expired on its own.
pub async fn prune_expired<C: ConnectionTrait>(db: &C) -> AuthnResult<u64> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let result = revoked_token::Entity::delete_many()
        .filter(revoked_token::Column::ExpiresAt.lt(now))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

fn normalize_username(raw: &str) -> AuthnResult<String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AuthnError::validation("username", "username is required"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuthnError::validation(
            "username",
            format!("username must be at most {MAX_USERNAME_LEN} characters"),
        ));
    }
    Ok(username.to_string())
}

fn hash_password(password: &str) -> AuthnResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthnError::Hash(err.to_string()))
}

fn username_taken() -> AuthnError {
    AuthnError::Conflict("username already exists".into())
}

fn invalid_credentials() -> AuthnError {
    AuthnError::unauthorized("invalid username or password")
}
