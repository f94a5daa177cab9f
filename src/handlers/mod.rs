pub mod admin;
pub mod contact;
pub mod dashboard;
pub mod payment;
pub mod plans;
pub mod store;

pub use admin::admin_config;
pub use contact::contact_config;
pub use dashboard::dashboard_config;
pub use payment::payment_config;
pub use plans::plans_config;
pub use store::store_config;
