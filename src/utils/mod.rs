pub mod jwt;
pub mod store_id;
pub mod validation;

pub use jwt::*;
pub use store_id::generate_store_id;
pub use validation::*;
