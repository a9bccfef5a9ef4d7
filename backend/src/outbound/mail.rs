//! Outbound reminder delivery.
//!
//! Reminders are logged and broadcast before delivery starts. The dispatcher
//! then hands each one to a [`MailTransport`] on a background task, one at a
//! time, logging and swallowing individual failures.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::domain::ports::MailDispatcher;
use crate::domain::{EmailLogEntry, TraceId};

/// Default sender when neither the entry nor configuration names one.
pub const DEFAULT_MAIL_FROM: &str = "library@bits-goa.ac.in";

/// A message ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
}

/// Failure reported by a transport for a single message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mail delivery to {to} failed: {message}")]
pub struct MailError {
    /// Recipient of the failed message.
    pub to: String,
    /// Transport-specific reason.
    pub message: String,
}

/// Delivers one message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send `mail`.
    ///
    /// # Errors
    /// Returns [`MailError`] when the message could not be delivered.
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError>;
}

/// Transport that records each message in the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailTransport;

#[async_trait]
impl MailTransport for LoggingMailTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            bytes = mail.text.len(),
            "reminder email captured"
        );
        Ok(())
    }
}

/// [`MailDispatcher`] that delivers through a transport in the background.
#[derive(Clone)]
pub struct TransportMailDispatcher {
    transport: Arc<dyn MailTransport>,
    default_from: String,
}

impl TransportMailDispatcher {
    /// Dispatcher using `transport`, falling back to `default_from`.
    pub fn new(transport: Arc<dyn MailTransport>, default_from: impl Into<String>) -> Self {
        Self {
            transport,
            default_from: default_from.into(),
        }
    }

    fn to_outbound(&self, entry: EmailLogEntry) -> OutboundMail {
        OutboundMail {
            from: entry.from.unwrap_or_else(|| self.default_from.clone()),
            to: entry.to,
            subject: entry.subject,
            text: entry.body,
        }
    }

    /// Deliver every entry in order; returns how many were delivered.
    pub async fn deliver_all(&self, entries: Vec<EmailLogEntry>) -> usize {
        let mut delivered = 0;
        for entry in entries {
            let mail = self.to_outbound(entry);
            match self.transport.send(&mail).await {
                Ok(()) => delivered += 1,
                Err(err) => warn!(error = %err, "reminder email not delivered"),
            }
        }
        delivered
    }
}

impl MailDispatcher for TransportMailDispatcher {
    fn dispatch(&self, entries: Vec<EmailLogEntry>) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(count = entries.len(), "no async runtime; reminder emails not delivered");
            return;
        };
        let dispatcher = self.clone();
        let trace_id = TraceId::current().unwrap_or_else(TraceId::generate);
        runtime.spawn(TraceId::scope(trace_id, async move {
            let total = entries.len();
            let delivered = dispatcher.deliver_all(entries).await;
            info!(total, delivered, "reminder delivery finished");
        }));
    }
}
