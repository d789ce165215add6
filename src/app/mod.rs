//! Application core - owns the inbox, the selection and the deferred queue

mod actions;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

use render_thread::RenderThread;

use crate::config::Config;
use crate::deferred::{
    ActionEvent, ActionExecutor, DeferredActionQueue, ItemId, ItemStatus, SelectionSet,
    StateReconciler,
};
use crate::input::KeyBindings;
use crate::remote::{Account, Email, RemoteService};
use state::{AppState, EmailRow, StatusState, UndoNotice};

pub struct App {
    pub(crate) config: Config,
    pub(crate) remote: Arc<dyn RemoteService>,
    /// Emails as last fetched from the service
    pub(crate) emails: Vec<Email>,
    pub(crate) accounts: Vec<Account>,
    pub(crate) selection: SelectionSet,
    pub(crate) queue: DeferredActionQueue,
    pub(crate) action_events: mpsc::Receiver<ActionEvent>,
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl App {
    pub fn new(config: Config, remote: Arc<dyn RemoteService>) -> Self {
        let reconciler = StateReconciler::new();
        let executor = ActionExecutor::new(Arc::clone(&remote));
        let queue = DeferredActionQueue::new(reconciler, executor);
        let action_events = queue.subscribe();

        let bindings = KeyBindings::new(&config.ui.keybinding_mode);

        let state = AppState {
            check_interval_hours: config.ui.check_interval_hours,
            grace: config.actions.grace_period(),
            status: StatusState {
                loading: true,
                ..Default::default()
            },
            ..Default::default()
        };

        Self {
            config,
            remote,
            emails: Vec::new(),
            accounts: Vec::new(),
            selection: SelectionSet::new(),
            queue,
            action_events,
            state,
            bindings,
            dirty: true, // Start dirty for initial render
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        self.state.set_status("Loading...");
        self.refresh().await;

        let result = self.event_loop(&render_thread).await;

        if self.config.actions.flush_on_exit {
            self.flush_pending_deletions().await;
        }

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        result
    }

    /// Commit every scheduled delete immediately (for app shutdown) and wait
    /// for deletes already in flight
    pub(crate) async fn flush_pending_deletions(&mut self) {
        let flushed = self.queue.flush().await;
        if !flushed.is_empty() {
            tracing::info!("Flushed {} pending action(s) on exit", flushed.len());
        }

        // These emails were not deleted; they show up again next session
        for action in self.queue.list_failed() {
            tracing::warn!(
                action_id = %action.action_id,
                count = action.len(),
                "Exiting with failed delete: {}",
                action.failure.as_deref().unwrap_or("unknown error")
            );
        }
    }

    /// Reload emails and accounts from the service
    pub(crate) async fn refresh(&mut self) {
        self.state.status.loading = true;

        match self.remote.fetch_emails().await {
            Ok(emails) => {
                let present: HashSet<&ItemId> = emails.iter().map(|e| &e.id).collect();
                let reconciler = self.queue.reconciler();

                // Removed items the service no longer reports need no tracking
                let gone: Vec<ItemId> = reconciler
                    .removed_ids()
                    .into_iter()
                    .filter(|id| !present.contains(id))
                    .collect();
                reconciler.forget_removed(&gone);

                self.selection.retain(|id| {
                    present.contains(id) && reconciler.status_of(id) == ItemStatus::Normal
                });

                tracing::debug!("Fetched {} emails", emails.len());
                self.emails = emails;
                self.state.set_status(format!("{} emails", self.emails.len()));
            }
            Err(e) => {
                tracing::error!("Failed to fetch emails: {:#}", e);
                self.state.set_error(format!("Failed to load emails: {}", e));
            }
        }

        match self.remote.fetch_accounts().await {
            Ok(accounts) => {
                for account in &accounts {
                    tracing::debug!(
                        id = %account.id,
                        "Linked account {} ({})",
                        account.email,
                        account.provider_name()
                    );
                }
                self.accounts = accounts;
            }
            Err(e) => tracing::warn!("Failed to fetch accounts: {:#}", e),
        }

        self.state.status.loading = false;
        self.sync_view();
    }

    /// Rebuild the render state from emails, selection and queue
    pub(crate) fn sync_view(&mut self) {
        let reconciler = self.queue.reconciler();

        self.state.rows = self
            .emails
            .iter()
            .filter_map(|email| {
                let status = reconciler.status_of(&email.id);
                if status == ItemStatus::Removed {
                    return None;
                }
                Some(EmailRow {
                    selected: self.selection.contains(&email.id),
                    failure: reconciler.failure_reason(&email.id),
                    status,
                    email: email.clone(),
                })
            })
            .collect();
        self.state.clamp_cursor();

        self.state.selected_count = self.selection.len();
        self.state.counts = reconciler.counts();
        self.state.accounts = self.accounts.clone();

        let now = tokio::time::Instant::now();
        self.state.pending = self
            .queue
            .list_pending()
            .iter()
            .map(|action| UndoNotice::from_action(action, now))
            .collect();
        self.state.failed = self
            .queue
            .list_failed()
            .iter()
            .map(|action| UndoNotice::from_action(action, now))
            .collect();

        self.dirty = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::remote::mock::MockRemote;
    use std::time::Duration;

    pub(crate) fn test_app(ids: &[&str]) -> (App, Arc<MockRemote>) {
        app_with(MockRemote::new().with_emails(ids))
    }

    /// App over the given mock with a 10 second grace window
    pub(crate) fn app_with(remote: MockRemote) -> (App, Arc<MockRemote>) {
        let remote = Arc::new(remote);
        let mut config = Config::default();
        config.actions.grace_period_secs = 10;
        let app = App::new(config, Arc::clone(&remote) as Arc<dyn RemoteService>);
        (app, remote)
    }

    #[tokio::test]
    async fn test_refresh_builds_rows() {
        let (mut app, _remote) = test_app(&["a", "b", "c"]);
        app.refresh().await;

        assert_eq!(app.state.rows.len(), 3);
        assert_eq!(app.state.accounts.len(), 1);
        assert_eq!(app.state.accounts[0].provider_name(), "Gmail");
        assert!(!app.state.status.loading);
        assert_eq!(app.state.grace, Duration::from_secs(10));
    }

    pub(crate) async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_drops_stale_selection() {
        let (mut app, remote) = test_app(&["a", "b", "c"]);
        app.refresh().await;
        for id in ["a", "b", "c"] {
            app.selection.toggle(&ItemId::from(id));
        }

        // "a" is deleted elsewhere, "b" is pending here
        app.queue
            .enqueue(vec![ItemId::from("b")], Duration::from_secs(10))
            .unwrap();
        remote.set_emails(&["b", "c"]);
        app.refresh().await;

        assert_eq!(app.selection.snapshot(), vec![ItemId::from("c")]);
        assert_eq!(app.state.selected_count, 1);
        assert_eq!(app.state.rows.len(), 2);
        assert!(app.state.rows[0].is_pending());
        assert!(!app.state.rows[0].selected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_rows_hidden_then_forgotten() {
        let (mut app, _remote) = test_app(&["a", "b"]);
        app.refresh().await;

        app.queue
            .enqueue(vec![ItemId::from("a")], Duration::from_secs(10))
            .unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        settle().await;

        app.sync_view();
        assert_eq!(app.state.rows.len(), 1);
        assert_eq!(app.state.rows[0].email.id, ItemId::from("b"));
        assert_eq!(app.state.counts.removed, 1);

        // The service stopped reporting "a", so it is no longer tracked
        app.refresh().await;
        assert_eq!(app.state.counts.removed, 0);
        assert_eq!(app.state.rows.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_flush_commits_pending_deletes() {
        let (mut app, remote) = test_app(&["a", "b"]);
        app.refresh().await;
        app.queue
            .enqueue(vec![ItemId::from("a")], Duration::from_secs(10))
            .unwrap();

        app.flush_pending_deletions().await;

        assert_eq!(remote.delete_calls(), vec![vec![ItemId::from("a")]]);
        assert!(app.queue.list_pending().is_empty());
        assert_eq!(app.queue.reconciler().status_of(&ItemId::from("a")), ItemStatus::Removed);
    }
}
