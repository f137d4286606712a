pub mod investment_request;
pub mod saved_startup;
pub mod startup;
pub mod user;

pub use investment_request::{Entity as InvestmentRequest, RequestStatus};
pub use saved_startup::Entity as SavedStartup;
pub use startup::Entity as Startup;
pub use user::{Entity as User, Role};
