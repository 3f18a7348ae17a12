use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role carried by an admin account and its tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::SuperAdmin),
            other => Err(format!("{} is not a valid admin role", other)),
        }
    }
}

impl AsRef<str> for AdminRole {
    fn as_ref(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }
}
