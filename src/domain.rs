mod admin_role;
mod email_address;
mod enquiry_type;
mod field;
mod person_name;
mod slug;
mod status;

pub use admin_role::AdminRole;
pub use email_address::EmailAddress;
pub use enquiry_type::EnquiryType;
pub use field::{
    optional, optional_date, parse_optional, parse_required, required, required_date,
};
pub use person_name::PersonName;
pub use slug::Slug;
pub use status::{LeadStatus, PostStatus, SubscriptionStatus};
