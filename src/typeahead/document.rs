//! Document-level seams: the host page the form lives in and the global events it broadcasts.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::position::{Rect, ScrollOffset};

const DOCUMENT_EVENT_CAPACITY: usize = 64;

/// Opaque handle for an element of the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// What the form needs to know about the page it is mounted in.
pub trait FormHost: Send {
    /// Current viewport-relative bounding box of the search form.
    fn form_rect(&self) -> Rect;

    fn scroll_offset(&self) -> ScrollOffset;

    /// Whether `target` is the form element or one of its descendants.
    fn form_contains(&self, target: NodeId) -> bool;

    /// Whether `target` is inside the detached suggestion surface.
    fn surface_contains(&self, _target: NodeId) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentEvent {
    PointerDown { target: NodeId },
    /// Any scroll in the document, including inner scroll containers.
    Scroll,
    Resize,
}

/// Broadcast hub for document-wide events.
#[derive(Debug, Clone)]
pub struct DocumentEvents {
    tx: broadcast::Sender<DocumentEvent>,
}

impl Default for DocumentEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(DOCUMENT_EVENT_CAPACITY);
        Self { tx }
    }

    /// Returns how many listeners saw the event.
    pub fn emit(&self, event: DocumentEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Runs `on_event` for every event until it returns `false` or the subscription is dropped.
    pub fn subscribe<F>(&self, mut on_event: F) -> Subscription
    where
        F: FnMut(DocumentEvent) -> bool + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if !on_event(event) {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::debug!("Document listener lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Subscription { task }
    }
}

/// Listener registration; dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn forwards_until_dropped() {
        let document = DocumentEvents::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = document.subscribe(move |event| tx.send(event).is_ok());
        assert_eq!(document.listener_count(), 1);

        document.emit(DocumentEvent::Resize);
        assert_eq!(rx.recv().await, Some(DocumentEvent::Resize));

        drop(subscription);
        tokio::task::yield_now().await;
        document.emit(DocumentEvent::Scroll);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }
}
