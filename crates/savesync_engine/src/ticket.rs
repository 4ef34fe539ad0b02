//! Completion handles for asynchronous requests.

use crate::error::{SyncError, SyncResult};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Resolves once with the result of one load or save.
///
/// Await it from async code or call [`SyncTicket::blocking_wait`] from a
/// plain thread. Dropping a ticket does not cancel the request.
#[must_use = "dropping a ticket discards the result, not the request"]
#[derive(Debug)]
pub struct SyncTicket<T> {
    receiver: oneshot::Receiver<SyncResult<T>>,
}

/// Sending half of a [`SyncTicket`].
pub(crate) type TicketSender<T> = oneshot::Sender<SyncResult<T>>;

impl<T> SyncTicket<T> {
    pub(crate) fn channel() -> (TicketSender<T>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { receiver })
    }

    /// Blocks the current thread until the result is available.
    ///
    /// Must not be called from inside an async task.
    pub fn blocking_wait(self) -> SyncResult<T> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(SyncError::Cancelled))
    }
}

impl<T> Future for SyncTicket<T> {
    type Output = SyncResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(SyncError::Cancelled)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_with_sent_value() {
        let (sender, ticket) = SyncTicket::<u64>::channel();
        sender.send(Ok(7)).unwrap();
        assert_eq!(ticket.await, Ok(7));
    }

    #[tokio::test]
    async fn dropped_sender_means_cancelled() {
        let (sender, ticket) = SyncTicket::<u64>::channel();
        drop(sender);
        assert_eq!(ticket.await, Err(SyncError::Cancelled));
    }

    #[test]
    fn blocking_wait_from_thread() {
        let (sender, ticket) = SyncTicket::<u64>::channel();
        let handle = std::thread::spawn(move || ticket.blocking_wait());
        sender.send(Err(SyncError::Busy)).unwrap();
        assert_eq!(handle.join().unwrap(), Err(SyncError::Busy));
    }
}
