//! Failure notices for the shopper.
//!
//! A [`Notifier`] is write-only: the store never looks at what happens to a
//! notice after it is handed over.

use tokio::sync::mpsc;

use crate::error::{CartError, Outcome};

/// Fire-and-forget channel for human-readable messages.
pub trait Notifier: Send + Sync {
    /// Deliver a message. Must not block and must not fail.
    fn notify(&self, message: &str);
}

/// Logs notices through `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(notice = %message, "Cart notice");
    }
}

/// Pushes notices onto an unbounded channel for a UI layer to drain.
///
/// Messages sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its messages arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str) {
        let _ = self.tx.send(message.to_string());
    }
}

/// Turn a mutation result into a notice, if one is warranted.
///
/// Committed and ignored outcomes are silent; every error produces exactly one
/// notice.
pub fn report<N: Notifier + ?Sized>(result: &Result<Outcome, CartError>, notifier: &N) {
    if let Err(err) = result {
        notifier.notify(err.notice());
    }
}

#[cfg(test)]
mod tests {
    use rocketcart_core::{Cart, ProductId};

    use super::*;
    use crate::error::{OUT_OF_STOCK_NOTICE, Operation};

    #[test]
    fn test_report_is_silent_on_success_and_ignore() {
        let (notifier, mut rx) = ChannelNotifier::new();

        report(&Ok(Outcome::Committed(Cart::new())), &notifier);
        report(&Ok(Outcome::Ignored), &notifier);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_report_sends_one_notice_per_error() {
        let (notifier, mut rx) = ChannelNotifier::new();

        report(
            &Err(CartError::InsufficientStock {
                operation: Operation::Add,
                product_id: ProductId::new(7),
                requested: 6,
                available: 5,
            }),
            &notifier,
        );

        assert_eq!(rx.try_recv().ok().as_deref(), Some(OUT_OF_STOCK_NOTICE));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify("nobody is listening");
    }
}
