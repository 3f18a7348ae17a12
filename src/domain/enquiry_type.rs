use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Topic a contact form submission is about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnquiryType {
    #[default]
    General,
    Sales,
    Service,
    TestDrive,
    Fleet,
    Other,
}

impl FromStr for EnquiryType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "general" => Ok(Self::General),
            "sales" => Ok(Self::Sales),
            "service" => Ok(Self::Service),
            "test-drive" => Ok(Self::TestDrive),
            "fleet" => Ok(Self::Fleet),
            "other" => Ok(Self::Other),
            other => Err(format!("{} is not a valid enquiry type", other)),
        }
    }
}

impl AsRef<str> for EnquiryType {
    fn as_ref(&self) -> &str {
        match self {
            Self::General => "general",
            Self::Sales => "sales",
            Self::Service => "service",
            Self::TestDrive => "test-drive",
            Self::Fleet => "fleet",
            Self::Other => "other",
        }
    }
}
