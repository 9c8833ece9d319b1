//! Latest-wins stream throttling

use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to add throttling to any Stream
pub trait ThrottleExt: Stream {
    /// Emit at most once per `duration`.
    ///
    /// Items arriving within one interval collapse to the latest. The first
    /// item is emitted immediately.
    fn throttle(self, duration: Duration) -> Throttle<Self>
    where
        Self: Sized,
    {
        Throttle::new(self, duration)
    }
}

impl<T: Stream> ThrottleExt for T {}

pin_project! {
    /// A stream combinator that throttles emission rate
    pub struct Throttle<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        pending: Option<S::Item>,
        done: bool,
    }
}

impl<S: Stream> Throttle<S> {
    pub fn new(stream: S, duration: Duration) -> Self {
        let mut interval = interval(duration);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { stream, interval, pending: None, done: false }
    }
}

impl<S: Stream> Stream for Throttle<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain everything ready, keeping only the latest
        while !*this.done {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.pending = Some(item),
                Poll::Ready(None) => *this.done = true,
                Poll::Pending => break,
            }
        }

        if this.pending.is_none() {
            return if *this.done { Poll::Ready(None) } else { Poll::Pending };
        }
        if *this.done {
            // flush the last item without waiting out the interval
            return Poll::Ready(this.pending.take());
        }

        match this.interval.poll_tick(cx) {
            Poll::Ready(_) => Poll::Ready(this.pending.take()),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    #[tokio::test(start_paused = true)]
    async fn collapses_bursts_to_the_latest_item() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut throttled = Box::pin(UnboundedReceiverStream::new(rx).throttle(Duration::from_millis(100)));

        tx.send(1).unwrap();
        assert_eq!(throttled.next().await, Some(1));

        for i in 2..=5 {
            tx.send(i).unwrap();
        }
        assert_eq!(throttled.next().await, Some(5));

        tx.send(6).unwrap();
        drop(tx);
        assert_eq!(throttled.next().await, Some(6));
        assert_eq!(throttled.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_items_instead_of_ending() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut throttled = Box::pin(UnboundedReceiverStream::new(rx).throttle(Duration::from_millis(50)));

        let sender = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            tx.send("late").unwrap();
        });
        assert_eq!(throttled.next().await, Some("late"));
        sender.await.unwrap();
    }
}
