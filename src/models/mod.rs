pub mod common;
pub mod contact_message;
pub mod dashboard;
pub mod pagination;
pub mod payment;
pub mod plan;
pub mod store;

pub use common::*;
pub use contact_message::*;
pub use dashboard::*;
pub use pagination::*;
pub use payment::*;
pub use plan::*;
pub use store::*;
