//! Application controller.
//!
//! Owns the session user, theme, report history, and the three-state view
//! machine (`form`, `loading`, `report`). All transitions go through this
//! controller; persistence is delegated to the [`Store`] and generation to
//! the injected [`ReportGenerator`]. Presentation code only ever sees
//! immutable [`Snapshot`]s.
//!
//! # Invariants
//!
//! - Exactly one view state is active at a time.
//! - `active_report` is `Some` if and only if the view is `Report`.
//! - `history` is strictly newest-first by completion order, unbounded.
//! - `user` is `None` if and only if the session is logged out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;

use insightforge_core::error::{ForgeError, Result};
use insightforge_core::generator::ReportGenerator;
use insightforge_core::report::{HistoryItem, Report, ResearchRequest};
use insightforge_core::state::ViewState;
use insightforge_core::store::{keys, Store};
use insightforge_core::theme::ThemeMode;
use insightforge_core::user::User;

const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default)]
struct ControllerState {
    user: Option<User>,
    theme: ThemeMode,
    history: Vec<HistoryItem>,
    view: ViewState,
    active_report: Option<Report>,
    last_error: Option<String>,
    /// Bumped on logout. A generation that resolves under a stale epoch
    /// belongs to a previous session and is discarded without touching state.
    epoch: u64,
}

/// Immutable snapshot of presentation-relevant state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub user: Option<User>,
    pub theme: ThemeMode,
    pub view: ViewState,
    pub active_report: Option<Report>,
    pub history: Vec<HistoryItem>,
    pub last_error: Option<String>,
}

/// The application controller.
///
/// State lives behind an `Arc<Mutex<_>>` so `&self` methods can be called
/// from anywhere the controller is shared; the single lock also keeps every
/// transition atomic with respect to concurrent callers.
pub struct AppController {
    state: Arc<Mutex<ControllerState>>,
    store: Store,
    generator: Arc<dyn ReportGenerator>,
    generation_timeout: Duration,
}

impl AppController {
    /// Builds a controller, restoring user, theme, and history from the
    /// store. Each key is read independently; an absent or corrupt value
    /// falls back to its default and never fails startup.
    pub async fn load(store: Store, generator: Arc<dyn ReportGenerator>) -> Self {
        let user = store.get::<Option<User>>(keys::USER, None).await;
        let theme = store.get::<ThemeMode>(keys::THEME, ThemeMode::default()).await;
        let history = store
            .get::<Vec<HistoryItem>>(keys::HISTORY, Vec::new())
            .await;

        Self {
            state: Arc::new(Mutex::new(ControllerState {
                user,
                theme,
                history,
                ..Default::default()
            })),
            store,
            generator,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// Overrides the timeout applied around each generation call.
    pub fn with_generation_timeout(mut self, generation_timeout: Duration) -> Self {
        self.generation_timeout = generation_timeout;
        self
    }

    /// Logs in with the given display name, minting and persisting a new
    /// user. The view state is left untouched.
    pub async fn login(&self, username: impl Into<String>) -> Result<User> {
        let user = User::login(username);
        {
            let mut state = self.state.lock().await;
            state.user = Some(user.clone());
            state.last_error = None;
        }
        self.store.set(keys::USER, &Some(user.clone())).await?;
        tracing::info!(username = %user.username, "logged in");
        Ok(user)
    }

    /// Tears down the session: clears the user and active report, forces the
    /// view back to the form, and invalidates any in-flight generation.
    /// History and theme stay persisted for the next login.
    pub async fn logout(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            state.user = None;
            state.active_report = None;
            state.view = ViewState::Form;
            state.last_error = None;
            state.epoch += 1;
        }
        self.store.set(keys::USER, &None::<User>).await?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Flips between light and dark mode and persists the result.
    pub async fn toggle_theme(&self) -> Result<ThemeMode> {
        let theme = {
            let mut state = self.state.lock().await;
            state.theme = state.theme.toggled();
            state.theme
        };
        self.store.set(keys::THEME, &theme).await?;
        Ok(theme)
    }

    /// Runs a generation: `form -> loading`, then `loading -> report` on
    /// success or `loading -> form` on failure.
    ///
    /// Refused unless a user is logged in and the view is currently the
    /// form, which also guarantees at most one generation is in flight. On
    /// success exactly one history item is prepended and persisted. On
    /// failure (including timeout) nothing is added to history, the error is
    /// recorded for display, and the same error is returned. A resolution
    /// arriving after a logout is ignored entirely.
    pub async fn generate(&self, request: ResearchRequest) -> Result<()> {
        let epoch = {
            let mut state = self.state.lock().await;
            if state.user.is_none() {
                return Err(ForgeError::invalid_state(
                    "cannot generate a report while logged out",
                ));
            }
            if state.view != ViewState::Form {
                return Err(ForgeError::invalid_state(format!(
                    "cannot start a generation from the {} view",
                    state.view
                )));
            }
            state.view = ViewState::Loading;
            state.last_error = None;
            state.epoch
        };

        let outcome = match timeout(self.generation_timeout, self.generator.generate(request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ForgeError::generation(format!(
                "generation timed out after {:?}",
                self.generation_timeout
            ))),
        };

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            tracing::debug!("discarding generation result from a stale session");
            return Ok(());
        }

        match outcome {
            Ok(report) => {
                let item = HistoryItem::from_report(&report);
                state.history.insert(0, item);
                state.active_report = Some(report);
                state.view = ViewState::Report;
                let history = state.history.clone();
                drop(state);
                self.store.set(keys::HISTORY, &history).await
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to generate report");
                state.view = ViewState::Form;
                state.active_report = None;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-opens a previously generated report from history. Idempotent:
    /// selecting the same item twice yields the same active report and
    /// leaves history untouched.
    pub async fn select_history(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.user.is_none() {
            return Err(ForgeError::invalid_state(
                "cannot open a history entry while logged out",
            ));
        }
        if state.view == ViewState::Loading {
            return Err(ForgeError::invalid_state(
                "cannot open a history entry while a generation is in flight",
            ));
        }
        let report = state
            .history
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.report.clone())
            .ok_or_else(|| ForgeError::not_found("history item", id))?;
        state.active_report = Some(report);
        state.view = ViewState::Report;
        Ok(())
    }

    /// Leaves the report view and returns to an empty form.
    pub async fn new_research(&self) {
        let mut state = self.state.lock().await;
        state.active_report = None;
        state.last_error = None;
        state.view = ViewState::Form;
    }

    /// Returns an immutable snapshot for rendering.
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().await;
        Snapshot {
            user: state.user.clone(),
            theme: state.theme,
            view: state.view,
            active_report: state.active_report.clone(),
            history: state.history.clone(),
            last_error: state.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insightforge_infrastructure::memory_store::MemoryStore;
    use insightforge_infrastructure::mock_generator::MockReportGenerator;

    struct FailingGenerator;

    #[async_trait]
    impl ReportGenerator for FailingGenerator {
        async fn generate(&self, _request: ResearchRequest) -> Result<Report> {
            Err(ForgeError::generation("backend exploded"))
        }
    }

    fn request(name: &str) -> ResearchRequest {
        ResearchRequest {
            startup_name: name.to_string(),
            target_sector: "Fintech".to_string(),
            objective: "test".to_string(),
            attachments: Vec::new(),
        }
    }

    fn memory_store() -> Store {
        Store::new(Arc::new(MemoryStore::new()))
    }

    async fn controller_with(store: Store, generator: Arc<dyn ReportGenerator>) -> AppController {
        AppController::load(store, generator).await
    }

    async fn fast_controller(store: Store) -> AppController {
        controller_with(
            store,
            Arc::new(MockReportGenerator::with_delay(Duration::from_millis(5))),
        )
        .await
    }

    #[tokio::test]
    async fn test_initial_snapshot() {
        let controller = fast_controller(memory_store()).await;
        let snap = controller.snapshot().await;
        assert!(snap.user.is_none());
        assert_eq!(snap.view, ViewState::Form);
        assert!(snap.active_report.is_none());
        assert!(snap.history.is_empty());
        assert_eq!(snap.theme, ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_login_generate_produces_report_and_history() {
        let controller = fast_controller(memory_store()).await;
        controller.login("alice").await.unwrap();

        controller.generate(request("Acme")).await.unwrap();

        let snap = controller.snapshot().await;
        assert_eq!(snap.view, ViewState::Report);
        let report = snap.active_report.expect("report view needs a report");
        assert_eq!(report.startup_name, "Acme");
        assert_eq!(snap.history.len(), 1);
        assert_eq!(snap.history[0].startup_name, "Acme");
        assert_eq!(snap.history[0].id, report.id);
    }

    #[tokio::test]
    async fn test_loading_view_while_generation_in_flight() {
        let controller = Arc::new(
            controller_with(
                memory_store(),
                Arc::new(MockReportGenerator::with_delay(Duration::from_millis(100))),
            )
            .await,
        );
        controller.login("alice").await.unwrap();

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.generate(request("Acme")).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let snap = controller.snapshot().await;
        assert_eq!(snap.view, ViewState::Loading);
        assert!(snap.active_report.is_none());

        background.await.unwrap().unwrap();
        assert_eq!(controller.snapshot().await.view, ViewState::Report);
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let controller = fast_controller(memory_store()).await;
        controller.login("alice").await.unwrap();

        for name in ["First", "Second", "Third"] {
            controller.generate(request(name)).await.unwrap();
            controller.new_research().await;
        }

        let snap = controller.snapshot().await;
        assert_eq!(snap.history.len(), 3);
        assert_eq!(snap.history[0].startup_name, "Third");
        assert_eq!(snap.history[1].startup_name, "Second");
        assert_eq!(snap.history[2].startup_name, "First");
    }

    #[tokio::test]
    async fn test_generation_failure_returns_to_form() {
        let controller = controller_with(memory_store(), Arc::new(FailingGenerator)).await;
        controller.login("alice").await.unwrap();

        let err = controller.generate(request("Acme")).await.unwrap_err();
        assert!(err.is_generation());

        let snap = controller.snapshot().await;
        assert_eq!(snap.view, ViewState::Form);
        assert!(snap.active_report.is_none());
        assert!(snap.history.is_empty());
        assert_eq!(
            snap.last_error.as_deref(),
            Some("Report generation error: backend exploded")
        );
    }

    #[tokio::test]
    async fn test_generation_timeout_is_a_failure() {
        let controller = controller_with(
            memory_store(),
            Arc::new(MockReportGenerator::with_delay(Duration::from_secs(60))),
        )
        .await
        .with_generation_timeout(Duration::from_millis(20));
        controller.login("alice").await.unwrap();

        let err = controller.generate(request("Acme")).await.unwrap_err();
        assert!(err.is_generation());

        let snap = controller.snapshot().await;
        assert_eq!(snap.view, ViewState::Form);
        assert!(snap.history.is_empty());
        assert!(snap.last_error.is_some());
    }

    #[tokio::test]
    async fn test_generate_refused_while_logged_out() {
        let controller = fast_controller(memory_store()).await;
        let err = controller.generate(request("Acme")).await.unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[tokio::test]
    async fn test_generate_refused_outside_form_view() {
        let controller = fast_controller(memory_store()).await;
        controller.login("alice").await.unwrap();
        controller.generate(request("Acme")).await.unwrap();

        // Still on the report view, so a second generation must be refused.
        let err = controller.generate(request("Other")).await.unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(controller.snapshot().await.history.len(), 1);
    }

    #[tokio::test]
    async fn test_select_history_is_idempotent() {
        let controller = fast_controller(memory_store()).await;
        controller.login("alice").await.unwrap();
        controller.generate(request("Acme")).await.unwrap();
        let id = controller.snapshot().await.history[0].id.clone();
        controller.new_research().await;

        controller.select_history(&id).await.unwrap();
        let first = controller.snapshot().await;
        controller.select_history(&id).await.unwrap();
        let second = controller.snapshot().await;

        assert_eq!(first.view, ViewState::Report);
        assert_eq!(
            first.active_report.as_ref().unwrap().id,
            second.active_report.as_ref().unwrap().id
        );
        assert_eq!(first.history.len(), second.history.len());
    }

    #[tokio::test]
    async fn test_select_unknown_history_item() {
        let controller = fast_controller(memory_store()).await;
        controller.login("alice").await.unwrap();
        let err = controller.select_history("rep-missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_new_research_clears_active_report() {
        let controller = fast_controller(memory_store()).await;
        controller.login("alice").await.unwrap();
        controller.generate(request("Acme")).await.unwrap();

        controller.new_research().await;

        let snap = controller.snapshot().await;
        assert_eq!(snap.view, ViewState::Form);
        assert!(snap.active_report.is_none());
        assert_eq!(snap.history.len(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_session_but_keeps_history_and_theme() {
        let store = memory_store();
        let controller = fast_controller(store.clone()).await;
        controller.login("alice").await.unwrap();
        controller.toggle_theme().await.unwrap();
        controller.generate(request("Acme")).await.unwrap();

        controller.logout().await.unwrap();

        let snap = controller.snapshot().await;
        assert!(snap.user.is_none());
        assert!(snap.active_report.is_none());
        assert_eq!(snap.view, ViewState::Form);

        // A fresh controller over the same store sees the persisted history
        // and theme, but no user.
        let restored = fast_controller(store).await;
        let snap = restored.snapshot().await;
        assert!(snap.user.is_none());
        assert_eq!(snap.theme, ThemeMode::Dark);
        assert_eq!(snap.history.len(), 1);
        assert_eq!(snap.history[0].startup_name, "Acme");
    }

    #[tokio::test]
    async fn test_theme_toggle_is_involution_and_persisted() {
        let store = memory_store();
        let controller = fast_controller(store.clone()).await;

        assert_eq!(controller.toggle_theme().await.unwrap(), ThemeMode::Dark);
        let stored: ThemeMode = store.get(keys::THEME, ThemeMode::Light).await;
        assert_eq!(stored, ThemeMode::Dark);

        assert_eq!(controller.toggle_theme().await.unwrap(), ThemeMode::Light);
        let stored: ThemeMode = store.get(keys::THEME, ThemeMode::Dark).await;
        assert_eq!(stored, ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_user_persists_across_restart() {
        let store = memory_store();
        let controller = fast_controller(store.clone()).await;
        let user = controller.login("alice").await.unwrap();

        let restored = fast_controller(store).await;
        let snap = restored.snapshot().await;
        assert_eq!(snap.user, Some(user));
    }

    #[tokio::test]
    async fn test_stale_generation_is_discarded_after_logout() {
        let controller = Arc::new(
            controller_with(
                memory_store(),
                Arc::new(MockReportGenerator::with_delay(Duration::from_millis(100))),
            )
            .await,
        );
        controller.login("alice").await.unwrap();

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.generate(request("Acme")).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.logout().await.unwrap();

        // The resolution lands after the logout and must not resurrect state.
        background.await.unwrap().unwrap();

        let snap = controller.snapshot().await;
        assert!(snap.user.is_none());
        assert_eq!(snap.view, ViewState::Form);
        assert!(snap.active_report.is_none());
        assert!(snap.history.is_empty());
    }
}
