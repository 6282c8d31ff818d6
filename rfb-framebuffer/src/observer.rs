//! Post-update notification.
//!
//! The processor calls [`UpdateObserver::on_update`] once per fully applied
//! update, synchronously, with the canvas borrowed. Observers that need the
//! pixels on another thread use [`QueuedObserver`], which hands an immutable
//! snapshot across a bounded channel instead.

use rfb_pixelbuffer::{Canvas, CanvasSnapshot};
use std::sync::Arc;

/// Receives the canvas after each update.
pub trait UpdateObserver: Send {
    fn on_update(&mut self, canvas: &Canvas);
}

impl<F> UpdateObserver for F
where
    F: FnMut(&Canvas) + Send,
{
    fn on_update(&mut self, canvas: &Canvas) {
        self(canvas)
    }
}

/// Pushes a snapshot of every update into a bounded queue.
///
/// When the consumer falls behind and the queue is full the frame is dropped;
/// the next update carries a complete frame anyway.
pub struct QueuedObserver {
    frames: flume::Sender<Arc<CanvasSnapshot>>,
    dropped: u64,
}

impl QueuedObserver {
    /// Create an observer and the receiving end of its queue.
    pub fn new(depth: usize) -> (Self, flume::Receiver<Arc<CanvasSnapshot>>) {
        let (tx, rx) = flume::bounded(depth);
        (
            Self {
                frames: tx,
                dropped: 0,
            },
            rx,
        )
    }

    /// Number of frames discarded because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl UpdateObserver for QueuedObserver {
    fn on_update(&mut self, canvas: &Canvas) {
        match self.frames.try_send(Arc::new(canvas.snapshot())) {
            Ok(()) => {}
            Err(flume::TrySendError::Full(_)) => {
                self.dropped += 1;
                tracing::warn!(dropped = self.dropped, "snapshot queue full, dropping frame");
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                tracing::debug!("snapshot receiver gone, dropping frame");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfb_pixelbuffer::PixelBuffer;

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |canvas: &Canvas| seen.push(canvas.dimensions());
            observer.on_update(&Canvas::new(3, 2));
        }
        assert_eq!(seen, vec![(3, 2)]);
    }

    #[test]
    fn test_queued_observer_delivers_snapshot() {
        let (mut observer, frames) = QueuedObserver::new(2);
        observer.on_update(&Canvas::new(4, 4));

        let frame = frames.try_recv().unwrap();
        assert_eq!(frame.dimensions(), (4, 4));
        assert_eq!(observer.dropped(), 0);
    }

    #[test]
    fn test_queued_observer_drops_when_full() {
        let (mut observer, frames) = QueuedObserver::new(1);
        observer.on_update(&Canvas::new(1, 1));
        observer.on_update(&Canvas::new(2, 2));

        assert_eq!(observer.dropped(), 1);
        assert_eq!(frames.try_recv().unwrap().dimensions(), (1, 1));
        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn test_queued_observer_receiver_dropped() {
        let (mut observer, frames) = QueuedObserver::new(1);
        drop(frames);
        observer.on_update(&Canvas::new(1, 1));
        assert_eq!(observer.dropped(), 1);
    }
}
