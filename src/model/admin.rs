use chrono::{DateTime, Utc};

use secrecy::Secret;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::domain::{AdminRole, EmailAddress, PersonName};
use crate::repo::Document;

/// Stored admin account.
/// Never serialized into a response, use `AdminProfile` for that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub name: String,
    pub role: AdminRole,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    pub fn new(email: EmailAddress, name: PersonName, role: AdminRole, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash,
            name: name.into(),
            role,
            last_login_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn password_hash(&self) -> Secret<String> {
        Secret::new(self.password_hash.clone())
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

impl Document for AdminAccount {
    const COLLECTION: &'static str = "admins";
    const UNIQUE: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Public view of an admin account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
