use crate::data::student::{Student, StudentId};
use std::sync::Arc;
use tokio::sync::{
    RwLock,
    broadcast::{Receiver, Sender, channel},
};

/// What the list region currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListRegion {
    #[default]
    Loading,
    Loaded(Vec<Student>),
    Failed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    ///which `show_message` call this came from, so a late timer can't dismiss a newer message
    pub generation: u64,
}

/// Everything the page displays, in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    pub list: ListRegion,
    pub message: Option<StatusMessage>,
    pub pending_delete: Option<StudentId>,
}

/// Which region of the page changed. The name doubles as the SSE event name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewChange {
    Roster,
    Message,
    Confirm,
}

impl ViewChange {
    pub const ALL: [Self; 3] = [Self::Roster, Self::Message, Self::Confirm];

    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Message => "message",
            Self::Confirm => "confirm",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewHandle {
    view: Arc<RwLock<RosterView>>,
    changes: Sender<ViewChange>,
}

impl Default for ViewHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHandle {
    pub fn new() -> Self {
        let (tx, _rx) = channel(16);
        Self {
            view: Arc::new(RwLock::new(RosterView::default())),
            changes: tx,
        }
    }

    pub async fn snapshot(&self) -> RosterView {
        self.view.read().await.clone()
    }

    /// Applies `f` and announces `change` if it reports that anything changed.
    pub async fn update(
        &self,
        change: ViewChange,
        f: impl FnOnce(&mut RosterView) -> bool,
    ) -> bool {
        let changed = {
            let mut view = self.view.write().await;
            f(&mut view)
        };
        if changed {
            self.publish(change);
        }
        changed
    }

    pub fn subscribe(&self) -> Receiver<ViewChange> {
        self.changes.subscribe()
    }

    fn publish(&self, change: ViewChange) {
        //nobody listening is fine - the page fetches regions on load
        let _ = self.changes.send(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_real_changes_are_announced() {
        let handle = ViewHandle::new();
        let mut rx = handle.subscribe();

        assert!(
            handle
                .update(ViewChange::Roster, |view| {
                    view.list = ListRegion::Failed;
                    true
                })
                .await
        );
        assert!(!handle.update(ViewChange::Message, |_| false).await);

        assert_eq!(rx.recv().await.expect("change"), ViewChange::Roster);
        assert!(rx.try_recv().is_err());
        assert_eq!(handle.snapshot().await.list, ListRegion::Failed);
    }
}
