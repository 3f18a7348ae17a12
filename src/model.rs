mod admin;
mod blog;
mod leads;
mod newsletter;
mod offer;

pub use admin::{AdminAccount, AdminProfile};
pub use blog::{derive_excerpt, normalize_tags, BlogPost, Seo};
pub use leads::{
    Attribution, ContactLead, Lead, QuoteRequest, ServiceBooking, SpecRequest, TestDriveRequest,
};
pub use newsletter::NewsletterSubscription;
pub use offer::{check_validity, Offer};
