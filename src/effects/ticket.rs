//! Completion tickets for presentation effects
//!
//! Every effect that gates a state transition receives an [`EffectTicket`].
//! The ticket fires exactly once: explicitly, after a delay, or when it is
//! dropped (including when an effect bails out with an error). Firing sends a
//! [`Delivery`] to the controller's wakeup channel.

use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// What the controller should do when a ticket fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wakeup {
    /// Correct-answer effect finished; advance to the next letter
    CorrectAnswerDone,
    /// Letter entrance finished; clear the busy flag
    LetterSettled,
    /// Wrong-answer message timed out
    WrongFeedbackExpired,
    /// Stage celebration finished; start the next stage
    CelebrationDone,
}

/// A fired ticket, tagged with the session it belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub epoch: u64,
    pub seq: u64,
    pub wakeup: Wakeup,
}

/// One-shot completion handle
#[derive(Debug)]
pub struct EffectTicket {
    delivery: Option<Delivery>,
    sink: UnboundedSender<Delivery>,
}

impl EffectTicket {
    pub fn seq(&self) -> Option<u64> {
        self.delivery.map(|d| d.seq)
    }

    /// Fire now
    pub fn complete(mut self) {
        self.fire();
    }

    /// Fire after `delay` on the current tokio runtime
    pub fn complete_after(self, delay: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            self.complete();
        })
    }

    fn fire(&mut self) {
        if let Some(delivery) = self.delivery.take() {
            if self.sink.send(delivery).is_err() {
                tracing::debug!(?delivery, "wakeup dropped: controller is gone");
            }
        }
    }
}

impl Drop for EffectTicket {
    fn drop(&mut self) {
        self.fire();
    }
}

/// Issues tickets and tracks how many are still in flight
#[derive(Debug)]
pub struct TicketBook {
    sink: UnboundedSender<Delivery>,
    epoch: u64,
    next_seq: u64,
    outstanding: usize,
}

impl TicketBook {
    /// Create a ticket book and the receiver its tickets deliver to
    pub fn channel() -> (Self, UnboundedReceiver<Delivery>) {
        let (sink, rx) = mpsc::unbounded_channel();
        let book = TicketBook {
            sink,
            epoch: 0,
            next_seq: 0,
            outstanding: 0,
        };
        (book, rx)
    }

    pub fn issue(&mut self, wakeup: Wakeup) -> EffectTicket {
        self.next_seq += 1;
        self.outstanding += 1;
        EffectTicket {
            delivery: Some(Delivery {
                epoch: self.epoch,
                seq: self.next_seq,
                wakeup,
            }),
            sink: self.sink.clone(),
        }
    }

    /// Account for a received delivery. Returns false when it belongs to an
    /// earlier session and must be ignored.
    pub fn settle(&mut self, delivery: &Delivery) -> bool {
        self.outstanding = self.outstanding.saturating_sub(1);
        delivery.epoch == self.epoch
    }

    /// Start a new session; tickets already issued become stale
    pub fn next_epoch(&mut self) {
        self.epoch += 1;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Tickets issued but not yet delivered and settled
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_fires_once_on_complete() {
        let (mut book, mut rx) = TicketBook::channel();
        let ticket = book.issue(Wakeup::CorrectAnswerDone);
        ticket.complete();

        let delivery = rx.try_recv().unwrap();
        assert_eq!(delivery.wakeup, Wakeup::CorrectAnswerDone);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_ticket_still_fires() {
        let (mut book, mut rx) = TicketBook::channel();
        drop(book.issue(Wakeup::CelebrationDone));

        assert_eq!(rx.try_recv().unwrap().wakeup, Wakeup::CelebrationDone);
    }

    #[test]
    fn test_settle_rejects_previous_epoch() {
        let (mut book, mut rx) = TicketBook::channel();
        book.issue(Wakeup::LetterSettled).complete();
        book.next_epoch();
        book.issue(Wakeup::LetterSettled).complete();
        assert_eq!(book.outstanding(), 2);

        let stale = rx.try_recv().unwrap();
        let fresh = rx.try_recv().unwrap();
        assert!(!book.settle(&stale));
        assert!(book.settle(&fresh));
        assert_eq!(book.outstanding(), 0);
        assert!(fresh.seq > stale.seq);
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_after_waits_for_delay() {
        let (mut book, mut rx) = TicketBook::channel();
        let started = tokio::time::Instant::now();
        book.issue(Wakeup::WrongFeedbackExpired)
            .complete_after(Duration::from_millis(2000));

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.wakeup, Wakeup::WrongFeedbackExpired);
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }
}
