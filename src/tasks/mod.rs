//! Background scheduled tasks.
//!
//! Call `spawn_all` once during startup.

use crate::services::SubscriptionService;

/// Spawn all background tasks. Detached via `tokio::spawn`; does not block.
///
/// The reconciliation sweep runs every `reconcile_interval_secs`; 0 disables it.
pub fn spawn_all(subscription_service: SubscriptionService, reconcile_interval_secs: u64) {
    if reconcile_interval_secs == 0 {
        log::info!("Scheduled reconciliation disabled");
        return;
    }

    let svc = subscription_service.clone();
    tokio::spawn(async move {
        loop {
            match svc.run_reconciliation().await {
                Ok(report) if !report.corrections.is_empty() || !report.failures.is_empty() => {
                    log::info!(
                        "Reconciliation: {} deactivated, {} failed",
                        report.corrections.len(),
                        report.failures.len()
                    )
                }
                Ok(_) => {}
                Err(e) => log::error!("Failed to run reconciliation: {e:?}"),
            }
            tokio::time::sleep(std::time::Duration::from_secs(reconcile_interval_secs)).await;
        }
    });
}
