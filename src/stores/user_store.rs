use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::auth::AuthError;
use crate::errors::user::UserError;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::auth::{Role, UserStatus};

/// Payload for user creation, already validated at the boundary
pub struct NewUser {
    pub nik: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<String>,
}

/// Partial profile update; None means "leave unchanged"
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

/// UserStore manages user records and credential verification
pub struct UserStore {
    db: DatabaseConnection,
    password_pepper: String,
    // Verified against when a nik lookup misses, so the miss path performs
    // the same amount of work as a password mismatch
    dummy_hash: String,
}

impl UserStore {
    /// Create a new UserStore with the given database connection and password pepper
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let dummy_hash = Argon2::default()
            .hash_password(b"placeholder-for-unknown-nik", &salt)
            .map(|hash| hash.to_string())
            .unwrap_or_default();

        Self {
            db,
            password_pepper,
            dummy_hash,
        }
    }

    /// Build the peppered Argon2id instance used for all real hashes
    fn hasher(&self) -> Result<Argon2<'_>, String> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| format!("Failed to initialize Argon2 with secret: {}", e))
    }

    /// Hash a plaintext password with Argon2id and the application pepper
    fn hash_password(&self, password: &str) -> Result<String, String> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| format!("Password hashing error: {}", e))?
            .to_string();
        Ok(hash)
    }

    /// Create a new user
    ///
    /// The pre-checks give precise conflict messages; the UNIQUE keys on nik
    /// and username are what actually guarantees that two concurrent creates
    /// with the same key cannot both succeed.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created record
    /// * `Err(UserError)` - Conflict on duplicate nik/username, or InternalError
    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, UserError> {
        let existing_nik = User::find()
            .filter(user::Column::Nik.eq(&new_user.nik))
            .one(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))?;
        if existing_nik.is_some() {
            return Err(UserError::duplicate_nik());
        }

        let existing_username = User::find()
            .filter(user::Column::Username.eq(&new_user.username))
            .one(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))?;
        if existing_username.is_some() {
            return Err(UserError::duplicate_username());
        }

        let password_hash = self
            .hash_password(&new_user.password)
            .map_err(UserError::internal_error)?;

        let now = Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nik: Set(new_user.nik),
            username: Set(new_user.username),
            password_hash: Set(password_hash),
            role: Set(new_user.role.as_str().to_string()),
            status: Set(UserStatus::Active.as_str().to_string()),
            full_name: Set(new_user.full_name),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            department_id: Set(new_user.department_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                // Lost a race against a concurrent create with the same key
                if msg.contains("nik") {
                    UserError::duplicate_nik()
                } else {
                    UserError::duplicate_username()
                }
            } else {
                UserError::internal_error(format!("Database error: {}", msg))
            }
        })?;

        Ok(created)
    }

    /// List all users in stable creation order
    pub async fn find_all(&self) -> Result<Vec<user::Model>, UserError> {
        User::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, UserError> {
        User::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))
    }

    /// Find a user by nik
    pub async fn find_by_nik(&self, nik: &str) -> Result<Option<user::Model>, UserError> {
        User::find()
            .filter(user::Column::Nik.eq(nik))
            .one(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))
    }

    /// Verify login credentials, returning the full user record on success
    ///
    /// The caller learns only success or `InvalidCredentials`. Unknown nik,
    /// wrong password, inactive/suspended account, and empty inputs all take
    /// the same exit; an unknown nik still pays for one Argon2 verification
    /// against the dummy hash.
    pub async fn verify_credentials(
        &self,
        nik: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let user = User::find()
            .filter(user::Column::Nik.eq(nik))
            .one(&self.db)
            .await
            .map_err(|_| AuthError::invalid_credentials())?;

        let user = match user {
            Some(user) => user,
            None => {
                if let Ok(parsed) = PasswordHash::new(&self.dummy_hash) {
                    let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
                }
                return Err(AuthError::invalid_credentials());
            }
        };

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|_| AuthError::invalid_credentials())?;

        let argon2 = self.hasher().map_err(|_| AuthError::invalid_credentials())?;

        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::invalid_credentials())?;

        // Only ACTIVE accounts may authenticate; the outcome is
        // indistinguishable from a bad password
        if UserStatus::parse(&user.status) != Some(UserStatus::Active) {
            return Err(AuthError::invalid_credentials());
        }

        Ok(user)
    }

    /// Update the status of a user
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The updated record, immediately visible to reads
    /// * `Err(UserError)` - NotFound if the id is unknown
    pub async fn update_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> Result<user::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or_else(UserError::not_found)?;

        let mut model: ActiveModel = user.into();
        model.status = Set(status.as_str().to_string());
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))
    }

    /// Update the role of a user
    pub async fn update_role(&self, id: &str, role: Role) -> Result<user::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or_else(UserError::not_found)?;

        let mut model: ActiveModel = user.into();
        model.role = Set(role.as_str().to_string());
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))
    }

    /// Replace the password of a user
    ///
    /// After this returns, the previous password no longer verifies and the
    /// new one does. Nothing else is touched.
    pub async fn set_password(&self, id: &str, new_password: &str) -> Result<(), UserError> {
        let user = self.find_by_id(id).await?.ok_or_else(UserError::not_found)?;

        let password_hash = self
            .hash_password(new_password)
            .map_err(UserError::internal_error)?;

        let mut model: ActiveModel = user.into();
        model.password_hash = Set(password_hash);
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))?;

        Ok(())
    }

    /// Apply a partial profile update
    ///
    /// Only the provided fields change. A username change goes through the
    /// same UNIQUE constraint as create, so the uniqueness invariant holds.
    pub async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<user::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or_else(UserError::not_found)?;

        let mut model: ActiveModel = user.into();
        if let Some(username) = &changes.username {
            model.username = Set(username.clone());
        }
        if let Some(full_name) = &changes.full_name {
            model.full_name = Set(full_name.clone());
        }
        if let Some(email) = &changes.email {
            model.email = Set(Some(email.clone()));
        }
        if let Some(phone) = &changes.phone {
            model.phone = Set(Some(phone.clone()));
        }
        model.updated_at = Set(Utc::now().timestamp());

        model.update(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                UserError::duplicate_username()
            } else {
                UserError::internal_error(format!("Database error: {}", msg))
            }
        })
    }

    /// Delete a user
    ///
    /// # Returns
    /// * `Ok(())` - Row removed
    /// * `Err(UserError)` - NotFound if the id is unknown
    pub async fn delete(&self, id: &str) -> Result<(), UserError> {
        let result = User::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| UserError::internal_error(format!("Database error: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(UserError::not_found());
        }

        Ok(())
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserStore {{ db: <connection>, password_pepper: <redacted> }}")
    }
}
