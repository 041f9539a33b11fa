//! Latest-wins stream pacing

use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to pace any stream for a display consumer
pub trait PaceExt: Stream {
    /// Emit at most once per `period`, with latest-wins semantics: items
    /// that arrive between emissions are superseded, not queued. The tail
    /// item is flushed when the underlying stream ends.
    fn paced(self, period: Duration) -> Paced<Self>
    where
        Self: Sized,
    {
        Paced::new(self, period)
    }
}

impl<T: Stream> PaceExt for T {}

pin_project! {
    /// A stream combinator that caps emission rate, keeping only the newest
    /// pending item
    pub struct Paced<S: Stream> {
        #[pin]
        stream: S,
        ticks: Interval,
        latest: Option<S::Item>,
        exhausted: bool,
    }
}

impl<S: Stream> Paced<S> {
    fn new(stream: S, period: Duration) -> Self {
        let mut ticks = interval(period);
        // A stalled consumer should not be paid back with a burst.
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { stream, ticks, latest: None, exhausted: false }
    }
}

impl<S: Stream> Stream for Paced<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain whatever the source has ready, superseding older items.
        if !*this.exhausted {
            loop {
                match this.stream.as_mut().poll_next(cx) {
                    Poll::Ready(Some(item)) => *this.latest = Some(item),
                    Poll::Ready(None) => {
                        *this.exhausted = true;
                        break;
                    }
                    Poll::Pending => break,
                }
            }
        }

        if *this.exhausted {
            // Flush the tail item, then end.
            return Poll::Ready(this.latest.take());
        }

        match this.ticks.poll_tick(cx) {
            Poll::Ready(_) => match this.latest.take() {
                Some(item) => Poll::Ready(Some(item)),
                // Tick with nothing pending; the source wakes us on arrival.
                None => Poll::Pending,
            },
            Poll::Pending => Poll::Pending,
        }
    }
}
