mod crm_client;
mod email_client;
mod notifier;

pub use crm_client::{CrmClient, CrmLead};
pub use email_client::{Email, EmailClient};
pub use notifier::LeadNotifier;
