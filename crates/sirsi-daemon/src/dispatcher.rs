// crates/sirsi-daemon/src/dispatcher.rs
//
// Background notification delivery loop: periodically drains queued
// notifications from the outbox, hands each to a delivery channel, and
// records the outcome.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sirsi_core::error::AdminError;
use sirsi_core::notification::Notification;
use sirsi_core::traits::NotificationOutbox;

/// Where notifications go once dispatched.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), AdminError>;
}

/// Delivers by emitting a structured log line. There is no external
/// transport behind the control plane.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

#[async_trait]
impl DeliveryChannel for LogChannel {
    async fn deliver(&self, n: &Notification) -> Result<(), AdminError> {
        tracing::info!(
            notification_id = %n.id,
            recipient = %n.recipient_id,
            kind = %n.kind,
            "Delivered notification: {}",
            n.title
        );
        Ok(())
    }
}

/// Outcome of one dispatch round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Run the background dispatch loop.
///
/// Every `interval`, delivers up to `batch` of the oldest queued
/// notifications. Errors are logged and the loop keeps going.
pub async fn run_dispatch_loop(
    outbox: Arc<dyn NotificationOutbox>,
    channel: Arc<dyn DeliveryChannel>,
    interval: Duration,
    batch: usize,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        match dispatch_once(outbox.as_ref(), channel.as_ref(), batch).await {
            Ok(report) if report.delivered + report.failed > 0 => {
                tracing::debug!(
                    "Dispatch round: {} delivered, {} failed",
                    report.delivered,
                    report.failed
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Dispatch loop error: {}", e),
        }
    }
}

/// Perform a single dispatch round.
pub async fn dispatch_once(
    outbox: &dyn NotificationOutbox,
    channel: &dyn DeliveryChannel,
    batch: usize,
) -> Result<DispatchReport, AdminError> {
    let mut report = DispatchReport::default();

    for notification in outbox.queued(batch).await? {
        match channel.deliver(&notification).await {
            Ok(()) => {
                outbox.mark_delivered(&notification.id).await?;
                report.delivered += 1;
            }
            Err(e) => {
                tracing::warn!("Delivery of {} failed: {}", notification.id, e);
                outbox.mark_failed(&notification.id, e.to_string()).await?;
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
