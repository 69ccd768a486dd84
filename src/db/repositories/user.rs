use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;
use crate::models::User;

/// Which unique field an attempted registration collides with. Each variant
/// maps to its own user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterConflict {
    Username,
    Email,
    DisplayName,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Checks the three unique registration fields in one query. Email wins
    /// over username wins over display name when several collide, matching
    /// the order the messages are surfaced in.
    pub async fn find_conflict(
        &self,
        username: &str,
        email: &str,
        display_name: &str,
    ) -> Result<Option<RegisterConflict>> {
        let clashes = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(username))
                    .add(users::Column::Email.eq(email))
                    .add(users::Column::DisplayName.eq(display_name)),
            )
            .all(&self.conn)
            .await
            .context("Failed to query users for registration conflicts")?;

        if clashes.iter().any(|u| u.email == email) {
            return Ok(Some(RegisterConflict::Email));
        }
        if clashes.iter().any(|u| u.username == username) {
            return Ok(Some(RegisterConflict::Username));
        }
        if clashes.iter().any(|u| u.display_name == display_name) {
            return Ok(Some(RegisterConflict::DisplayName));
        }

        Ok(None)
    }

    pub async fn create(&self, new_user: NewUser, config: &SecurityConfig) -> Result<User> {
        let password = new_user.password;
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let model = users::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            display_name: Set(new_user.display_name),
            password_hash: Set(password_hash),
            role: Set("user".to_string()),
            created_at: Set(now),
            first_login: Set(None),
            last_login: Set(None),
            ..Default::default()
        };

        let inserted = model.insert(&self.conn).await?;
        Ok(User::from(inserted))
    }

    /// Verifies credentials and returns the user on success.
    /// Argon2 verification runs in `spawn_blocking` because it is
    /// CPU-intensive and would stall the async runtime.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        if is_valid {
            Ok(Some(User::from(user)))
        } else {
            Ok(None)
        }
    }

    /// Stamps `first_login` on the first successful login, `last_login` on
    /// every one after.
    pub async fn stamp_login(&self, user_id: i32) -> Result<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query user for login stamp")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {user_id}"))?;

        let now = chrono::Utc::now().to_rfc3339();
        let first_login = user.first_login.clone();

        let mut active: users::ActiveModel = user.into();
        if first_login.is_none() {
            active.first_login = Set(Some(now));
        } else {
            active.last_login = Set(Some(now));
        }
        active.update(&self.conn).await?;

        Ok(())
    }
}

/// Hash a password with Argon2id using the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
