//! This module contains the core [`Subscription`] type that consumers of this API will use to
//! observe rate events.
use std::{
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::mpsc;

/// The primary type that consumers of this API will handle. It is created via
/// [`RateLedger::subscribe`](crate::RateLedger::subscribe). From there you should use it via its
/// [`futures::Stream`] API.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Intentionally left private so as not to leak implementation details to consuming APIs.
    pub(crate) const fn from_receiver(receiver: mpsc::UnboundedReceiver<T>) -> Subscription<T> {
        Subscription { receiver }
    }

    /// Returns the number of events waiting to be consumed.
    pub fn backlog(&self) -> usize {
        self.receiver.len()
    }

    /// Takes the next event if one is already queued, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

impl<T> futures::Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
