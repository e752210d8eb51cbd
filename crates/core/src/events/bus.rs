use tokio::sync::broadcast;

use super::types::EditorEvent;

/// Events a slow subscriber may fall behind by before it sees `Lagged`.
const EVENT_BACKLOG: usize = 1024;

/// Fan-out of editor events to every save trigger listening.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Deliver `event` to current subscribers; returns how many received it.
    pub fn publish(&self, event: EditorEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BACKLOG);
        Self { sender }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(EditorEvent::CanvasReloaded), 2);
        assert_eq!(first.recv().await.unwrap(), EditorEvent::CanvasReloaded);
        assert_eq!(second.recv().await.unwrap(), EditorEvent::CanvasReloaded);
    }

    #[test]
    fn events_without_listeners_are_dropped() {
        assert_eq!(EventBus::default().publish(EditorEvent::StyleUpdated), 0);
    }
}
