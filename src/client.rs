use crate::{
    api::StudentsApi,
    data::student::{DraftForm, StudentId},
    view::{ListRegion, MessageKind, StatusMessage, ViewChange, ViewHandle},
};
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Duration,
};
use tokio::{sync::Mutex, task::JoinHandle};

pub const INVALID_FORM_MESSAGE: &str = "Please fill in all fields correctly.";
pub const STUDENT_ADDED_MESSAGE: &str = "Student added successfully!";
pub const STUDENT_DELETED_MESSAGE: &str = "Student deleted successfully!";
pub const DELETE_BUSY_MESSAGE: &str = "Another student is still being deleted, please try again.";

/// Interactions delivered from the list container and the confirmation prompt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    Refresh,
    DeleteClicked(StudentId),
    ///`id` is the student the answered prompt was showing
    AnswerDelete { id: StudentId, confirmed: bool },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    NotCreated,
    ///another submit was still in flight, so nothing was sent
    Busy,
}

/// Drives the roster page: talks to the backend and keeps the [`ViewHandle`] current.
#[derive(Debug)]
pub struct RosterClient<A> {
    api: A,
    view: ViewHandle,
    message_dismiss_after: Duration,
    load_sequence: AtomicU64,
    message_generation: AtomicU64,
    create_in_flight: AtomicBool,
    delete_in_flight: AtomicBool,
    message_timer: Mutex<Option<JoinHandle<()>>>,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: StudentsApi> RosterClient<A> {
    pub fn new(api: A, view: ViewHandle, message_dismiss_after: Duration) -> Self {
        Self {
            api,
            view,
            message_dismiss_after,
            load_sequence: AtomicU64::new(0),
            message_generation: AtomicU64::new(0),
            create_in_flight: AtomicBool::new(false),
            delete_in_flight: AtomicBool::new(false),
            message_timer: Mutex::new(None),
        }
    }

    pub const fn view(&self) -> &ViewHandle {
        &self.view
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub async fn dispatch(&self, event: RosterEvent) {
        debug!(?event, "Dispatching roster event");
        match event {
            RosterEvent::Refresh => self.load_roster().await,
            RosterEvent::DeleteClicked(id) => self.request_delete(id).await,
            RosterEvent::AnswerDelete { id, confirmed } => {
                self.answer_delete(id, confirmed).await;
            }
        }
    }

    /// Re-fetches the whole roster. Failures end up in the list region, never with the caller.
    ///
    /// Only the most recently started load gets to touch the view.
    pub async fn load_roster(&self) {
        let token = self.load_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.apply_roster(token, ListRegion::Loading).await;

        let region = match self.api.list_students().await {
            Ok(students) => {
                debug!(token, count = students.len(), "Loaded roster");
                ListRegion::Loaded(students)
            }
            Err(e) => {
                error!(?e, "Failed to load students");
                ListRegion::Failed
            }
        };

        if !self.apply_roster(token, region).await {
            debug!(token, "Discarding roster from a superseded load");
        }
    }

    async fn apply_roster(&self, token: u64, region: ListRegion) -> bool {
        self.view
            .update(ViewChange::Roster, |view| {
                if self.load_sequence.load(Ordering::SeqCst) != token {
                    return false;
                }
                view.list = region;
                true
            })
            .await
    }

    /// Validates and sends a new student. Returns whether the backend accepted it.
    pub async fn create_student(&self, form: &DraftForm) -> bool {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(rejection) => {
                info!(?rejection, "Refusing to send an invalid student");
                self.show_message(INVALID_FORM_MESSAGE, MessageKind::Error)
                    .await;
                return false;
            }
        };

        match self.api.create_student(&draft).await {
            Ok(()) => true,
            Err(e) => {
                error!(?e, "Failed to add student");
                self.show_message(e.to_string(), MessageKind::Error).await;
                false
            }
        }
    }

    pub async fn submit(&self, form: &DraftForm) -> SubmitOutcome {
        let Some(_busy) = BusyGuard::try_acquire(&self.create_in_flight) else {
            warn!("Ignoring submit while another is in flight");
            return SubmitOutcome::Busy;
        };

        if !self.create_student(form).await {
            return SubmitOutcome::NotCreated;
        }

        self.show_message(STUDENT_ADDED_MESSAGE, MessageKind::Success)
            .await;
        self.load_roster().await;
        SubmitOutcome::Created
    }

    pub async fn request_delete(&self, id: StudentId) {
        self.view
            .update(ViewChange::Confirm, |view| {
                view.pending_delete = Some(id);
                true
            })
            .await;
    }

    /// Resolves the pending confirmation for `id`. Returns whether a student was deleted.
    ///
    /// An answer for any other student than the one pending is stale and ignored.
    pub async fn answer_delete(&self, id: StudentId, confirmed: bool) -> bool {
        let answered = self
            .view
            .update(ViewChange::Confirm, |view| {
                if view.pending_delete != Some(id) {
                    return false;
                }
                view.pending_delete = None;
                true
            })
            .await;

        if !answered {
            debug!(id, confirmed, "No deletion of this student awaiting confirmation");
            return false;
        }
        if !confirmed {
            info!(id, "Deletion declined");
            return false;
        }

        if !self.delete_student(id).await {
            return false;
        }

        self.show_message(STUDENT_DELETED_MESSAGE, MessageKind::Success)
            .await;
        self.load_roster().await;
        true
    }

    //only reachable through a confirmation
    async fn delete_student(&self, id: StudentId) -> bool {
        let Some(_busy) = BusyGuard::try_acquire(&self.delete_in_flight) else {
            warn!(id, "Ignoring delete while another is in flight");
            self.show_message(DELETE_BUSY_MESSAGE, MessageKind::Error)
                .await;
            return false;
        };

        match self.api.delete_student(id).await {
            Ok(()) => true,
            Err(e) => {
                error!(?e, id, "Failed to delete student");
                self.show_message(e.to_string(), MessageKind::Error).await;
                false
            }
        }
    }

    /// Shows a status banner and (re)starts its dismissal timer.
    pub async fn show_message(&self, text: impl Into<String>, kind: MessageKind) {
        let mut timer = self.message_timer.lock().await;
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let generation = self.message_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let text = text.into();
        self.view
            .update(ViewChange::Message, |view| {
                view.message = Some(StatusMessage {
                    text,
                    kind,
                    generation,
                });
                true
            })
            .await;

        let view = self.view.clone();
        let delay = self.message_dismiss_after;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            view.update(ViewChange::Message, |view| {
                if view
                    .message
                    .as_ref()
                    .is_some_and(|message| message.generation == generation)
                {
                    view.message = None;
                    true
                } else {
                    false
                }
            })
            .await;
        }));
    }

    pub async fn shutdown(&self) {
        if let Some(timer) = self.message_timer.lock().await.take() {
            timer.abort();
        }
    }
}
