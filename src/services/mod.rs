pub mod contact_service;
pub mod payment_service;
pub mod store_service;
pub mod subscription_service;

pub use contact_service::*;
pub use payment_service::*;
pub use store_service::*;
pub use subscription_service::*;
