//! Subscription lifecycle engine: expiry calculation, status classification
//! and reconciliation of the persisted status flag.

pub mod clock;
pub mod expiry;
pub mod notify;
pub mod reconciler;
pub mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use expiry::{PlanTerm, compute_expiry};
pub use notify::{Notification, NotificationCenter, NotificationKind, NotificationSink};
pub use reconciler::{
    CorrectionEvent, CorrectionFailure, ReconcileReport, SubscriberStore, plan_corrections,
    reconcile,
};
pub use status::{
    EXPIRING_SOON_HOURS, LifecycleState, TimeRemaining, classify, classify_expiry,
    latest_record, time_remaining,
};
