pub mod contact_messages;
pub mod stores;
pub mod subscription_payments;

pub use contact_messages as contact_message_entity;
pub use contact_messages::MessageStatus;
pub use stores as store_entity;
pub use stores::SubscriptionStatus;
pub use subscription_payments as payment_entity;

/// A subscriber account as the lifecycle engine sees it.
pub type SubscriberAccount = stores::Model;
/// A single ledger entry of the payment feed.
pub type PaymentRecord = subscription_payments::Model;
