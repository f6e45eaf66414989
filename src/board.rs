//! The activity board view controller.
//!
//! `ActivityBoard` owns the screen model, talks to the activities API and
//! decides what the user sees after every action. The two mutating flows
//! (signup and removal) are independent and may overlap; they only meet at
//! the status slot, which orders their messages by request sequence.

use crate::client::ActivityApi;
use crate::config::BoardConfig;
use crate::errors::BoardError;
use crate::render::{render_page, render_text};
use crate::status::{StatusMessage, StatusSlot, Ticket};
use crate::view::{BoardView, ListRegion, RowTarget, Screen, SignupForm};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const REMOVE_FAILED: &str = "Failed to remove participant";
pub const SIGNUP_REJECTED: &str = "An error occurred";
pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";

/// Interactive yes/no prompt shown before a participant is removed.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
    /// A newer load already landed; this response was discarded.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    Failed,
    Declined,
    /// The signup form was missing a required field.
    Incomplete,
    /// The clicked row is not part of the current list.
    Ignored,
}

struct ScreenState {
    region: ListRegion,
    view: BoardView,
    form: SignupForm,
    applied_load: u64,
}

pub struct ActivityBoard {
    api: Arc<dyn ActivityApi>,
    config: BoardConfig,
    screen: Mutex<ScreenState>,
    status: Arc<Mutex<StatusSlot>>,
    load_seq: AtomicU64,
}

impl ActivityBoard {
    pub fn new(api: Arc<dyn ActivityApi>, config: BoardConfig) -> Self {
        Self {
            api,
            config,
            screen: Mutex::new(ScreenState {
                region: ListRegion::Loading,
                view: BoardView::default(),
                form: SignupForm::default(),
                applied_load: 0,
            }),
            status: Arc::new(Mutex::new(StatusSlot::default())),
            load_seq: AtomicU64::new(0),
        }
    }

    /// Fetches the catalog and rebuilds the list and the activity options
    /// from it.
    pub async fn load_catalog(&self) -> LoadOutcome {
        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.fetch_catalog().await;

        let mut screen = self.screen.lock().await;
        if seq < screen.applied_load {
            debug!(seq, applied = screen.applied_load, "discarding stale catalog response");
            return LoadOutcome::Stale;
        }
        screen.applied_load = seq;

        match result {
            Ok(catalog) => {
                screen.view = BoardView::from_catalog(&catalog);
                screen.region = ListRegion::Ready;
                info!(activities = catalog.len(), "catalog loaded");
                LoadOutcome::Loaded(catalog.len())
            }
            Err(err) => {
                error!("error fetching activities: {err}");
                screen.region = ListRegion::Failed;
                LoadOutcome::Failed
            }
        }
    }

    /// Single entry point for clicks inside the activities list. The row is
    /// resolved against the list currently on screen.
    pub async fn click(&self, target: &RowTarget, confirm: &dyn Confirm) -> ActionOutcome {
        let live = {
            let screen = self.screen.lock().await;
            screen.region == ListRegion::Ready && screen.view.contains_row(target)
        };
        if !live {
            warn!(activity = %target.activity, email = %target.email, "click on unknown row ignored");
            return ActionOutcome::Ignored;
        }
        self.remove_participant(&target.activity, &target.email, confirm)
            .await
    }

    pub async fn remove_participant(
        &self,
        activity: &str,
        email: &str,
        confirm: &dyn Confirm,
    ) -> ActionOutcome {
        if !confirm.confirm(&format!("Remove {email} from {activity}?")) {
            debug!(activity, email, "removal declined");
            return ActionOutcome::Declined;
        }

        let ticket = self.status.lock().await.issue();
        let ttl = self.config.removal_message_ttl;
        match self.api.unregister(activity, email).await {
            Ok(message) => {
                self.show(ticket, StatusMessage::success(message), ttl).await;
                self.load_catalog().await;
                ActionOutcome::Succeeded
            }
            Err(err) => {
                log_failure("remove participant", &err);
                let text = err.detail().unwrap_or(REMOVE_FAILED);
                self.show(ticket, StatusMessage::error(text), ttl).await;
                ActionOutcome::Failed
            }
        }
    }

    /// Submits the signup form as it stands right now.
    pub async fn submit_signup(&self) -> ActionOutcome {
        let form = self.screen.lock().await.form.clone();
        if !form.is_complete() {
            debug!("signup form incomplete");
            return ActionOutcome::Incomplete;
        }

        let ticket = self.status.lock().await.issue();
        let ttl = self.config.signup_message_ttl;
        match self.api.signup(&form.activity, &form.email).await {
            Ok(message) => {
                self.show(ticket, StatusMessage::success(message), ttl).await;
                self.screen.lock().await.form.reset();
                self.load_catalog().await;
                ActionOutcome::Succeeded
            }
            Err(err) => {
                log_failure("sign up", &err);
                let text = match &err {
                    BoardError::Rejected { detail, .. } => {
                        detail.as_deref().unwrap_or(SIGNUP_REJECTED)
                    }
                    _ => SIGNUP_FAILED,
                };
                self.show(ticket, StatusMessage::error(text), ttl).await;
                ActionOutcome::Failed
            }
        }
    }

    pub async fn set_email(&self, email: impl Into<String>) {
        self.screen.lock().await.form.email = email.into();
    }

    /// Picks an activity in the selection control. Only values offered by the
    /// current options can be selected.
    pub async fn select_activity(&self, activity: &str) -> bool {
        let mut screen = self.screen.lock().await;
        if !screen.view.has_option(activity) {
            return false;
        }
        screen.form.activity = activity.to_string();
        true
    }

    pub async fn screen(&self) -> Screen {
        let status = self.status.lock().await.current().cloned();
        let screen = self.screen.lock().await;
        Screen {
            region: screen.region,
            view: screen.view.clone(),
            form: screen.form.clone(),
            status,
        }
    }

    pub async fn render_html(&self) -> Result<String, askama::Error> {
        render_page(&self.screen().await)
    }

    pub async fn render_text(&self) -> String {
        render_text(&self.screen().await)
    }

    async fn show(&self, ticket: Ticket, message: StatusMessage, ttl: Duration) {
        if !self.status.lock().await.publish(ticket, message) {
            debug!(?ticket, "newer status already shown; dropping message");
            return;
        }
        let status = Arc::clone(&self.status);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            status.lock().await.hide(ticket);
        });
    }
}

fn log_failure(action: &str, err: &BoardError) {
    match err {
        BoardError::Rejected { status, detail } => {
            warn!(status, ?detail, "{action} rejected by server");
        }
        _ => error!("error trying to {action}: {err}"),
    }
}
