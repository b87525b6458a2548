//! Notification seam
//!
//! Actual delivery (SMTP or otherwise) lives outside this crate; the
//! approval chain hands finished notices to whatever `Notifier` the
//! caller wires in. The allocation engine never notifies anyone.

use crate::error::Result;

/// A message addressed to one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notice {
    pub fn new(recipient: String, subject: String, body: String) -> Self {
        Self {
            recipient,
            subject,
            body,
        }
    }
}

/// Delivery backend for notices
pub trait Notifier {
    fn deliver(&self, notice: &Notice) -> Result<()>;
}

/// Notifier that writes notices to the log instead of sending them
///
/// The default backend for development and for deployments without an
/// outbound mail path.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, notice: &Notice) -> Result<()> {
        tracing::info!(
            recipient = %notice.recipient,
            subject = %notice.subject,
            "Notice delivered to log"
        );
        Ok(())
    }
}
