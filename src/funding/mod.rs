//! Founder/investor funding workflow.
//!
//! Handlers in `crate::routes` stay thin; everything that reads or mutates
//! records lives here and takes the caller's typed id from `crate::auth`.

pub mod acceptance;
pub mod accounts;
pub mod money;
pub mod requests;
pub mod saved;
pub mod startups;

pub use acceptance::{decide_request, Decision};
pub use accounts::register_user;
pub use requests::{
    create_request, get_request_record, list_founder_requests, list_investments, list_investor_requests, RequestRecord,
};
pub use saved::{list_saved, save_startup, unsave_startup, SaveOutcome};
pub use startups::{
    browse_startups, create_startup, get_startup, list_founder_startups, update_startup, BrowseFilter,
    NewStartup, StartupChanges,
};
