//! In-process publish/subscribe for store writes. Views subscribe to the
//! topics they render and refetch when a change arrives.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use treadline_core::domain::{LeadId, NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Leads,
    Notes,
    Goals,
    Webhooks,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Leads, Topic::Notes, Topic::Goals, Topic::Webhooks];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    LeadCreated(LeadId),
    LeadUpdated(LeadId),
    LeadDeleted(LeadId),
    NoteAdded { lead_id: LeadId, note_id: NoteId },
    GoalsChanged,
    WebhooksChanged,
    /// Another process committed to the database.
    External,
}

impl StoreChange {
    /// Topic the change belongs to; `External` belongs to all of them.
    pub fn topic(&self) -> Option<Topic> {
        match self {
            StoreChange::LeadCreated(_)
            | StoreChange::LeadUpdated(_)
            | StoreChange::LeadDeleted(_) => Some(Topic::Leads),
            StoreChange::NoteAdded { .. } => Some(Topic::Notes),
            StoreChange::GoalsChanged => Some(Topic::Goals),
            StoreChange::WebhooksChanged => Some(Topic::Webhooks),
            StoreChange::External => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<(Topic, Sender<StoreChange>)>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: Topic) -> Receiver<StoreChange> {
        let (tx, rx) = channel();
        self.lock().push((topic, tx));
        rx
    }

    /// Sends `change` to every subscriber of its topic and drops
    /// subscribers whose receiver is gone.
    pub fn publish(&self, change: StoreChange) {
        let topic = change.topic();
        self.lock().retain(|(subscribed, sender)| {
            if topic.is_some_and(|topic| topic != *subscribed) {
                return true;
            }
            sender.send(change.clone()).is_ok()
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Topic, Sender<StoreChange>)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeNotifier, StoreChange, Topic};
    use treadline_core::domain::LeadId;

    #[test]
    fn publish_reaches_only_matching_topic() {
        let notifier = ChangeNotifier::new();
        let leads = notifier.subscribe(Topic::Leads);
        let goals = notifier.subscribe(Topic::Goals);

        let id = LeadId::new();
        notifier.publish(StoreChange::LeadUpdated(id));

        assert_eq!(leads.try_recv().unwrap(), StoreChange::LeadUpdated(id));
        assert!(goals.try_recv().is_err());
    }

    #[test]
    fn external_change_reaches_every_topic() {
        let notifier = ChangeNotifier::new();
        let receivers: Vec<_> = Topic::ALL
            .iter()
            .map(|topic| notifier.subscribe(*topic))
            .collect();
        notifier.publish(StoreChange::External);
        for rx in receivers {
            assert_eq!(rx.try_recv().unwrap(), StoreChange::External);
        }
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let notifier = ChangeNotifier::new();
        let kept = notifier.subscribe(Topic::Notes);
        drop(notifier.subscribe(Topic::Notes));
        notifier.publish(StoreChange::GoalsChanged);
        assert_eq!(notifier.subscriber_count(), 2);
        notifier.publish(StoreChange::External);
        assert_eq!(notifier.subscriber_count(), 1);
        drop(kept);
    }
}
