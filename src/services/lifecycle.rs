// Ciclo de vida compartilhado pelas telas: carregar → normalizar → renderizar,
// e editar → validar → enviar. Cancelamento via AbortHandle.

use chrono::{DateTime, Duration, Utc};
use futures::future::{AbortHandle, Abortable, Aborted};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::gateway::{DataGateway, UpdateCommand, UpdateResponse};
use crate::session::{ProfileSection, Session, SessionStore};
use crate::utils::AppError;

/// How long a validation message stays on screen
pub const ERROR_DISPLAY_SECS: u64 = 5;

pub const GENERIC_LOAD_ERROR: &str = "Something went wrong while loading. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Empty(String),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Runs a load to completion. The result is never `Loading`: errors become
/// `Failed` and `None` becomes `Empty`.
pub async fn load_view<T, Fut>(load: Fut, empty_message: &str) -> ViewState<T>
where
    Fut: Future<Output = Result<Option<T>, AppError>>,
{
    match load.await {
        Ok(Some(value)) => ViewState::Ready(value),
        Ok(None) => ViewState::Empty(empty_message.to_string()),
        Err(e) => {
            log::error!("❌ Failed to load view: {}", e);
            ViewState::Failed(match e {
                AppError::Gateway(_) | AppError::Config(_) => GENERIC_LOAD_ERROR.to_string(),
                other => other.to_string(),
            })
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum LoadOutcome<T> {
    Committed(T),
    Cancelled,
}

/// Owns the in-flight loads of one screen. `teardown` aborts them and later
/// results are dropped instead of committed.
pub struct ViewScope<S> {
    handles: Mutex<HashMap<u64, AbortHandle>>,
    next_id: AtomicU64,
    state: Mutex<Option<S>>,
}

impl<S: Clone> Default for ViewScope<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> ViewScope<S> {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            state: Mutex::new(None),
        }
    }

    pub async fn run<Fut>(&self, load: Fut) -> LoadOutcome<S>
    where
        Fut: Future<Output = S>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock_handles().insert(id, handle);
        // libera o handle ao terminar, mesmo se o future for dropado
        let _slot = HandleSlot { scope: self, id };

        match Abortable::new(load, registration).await {
            Ok(value) => {
                *self.state.lock().unwrap_or_else(|e| e.into_inner()) = Some(value.clone());
                LoadOutcome::Committed(value)
            }
            Err(Aborted) => {
                log::debug!("🛑 Load cancelled after view teardown");
                LoadOutcome::Cancelled
            }
        }
    }

    pub fn teardown(&self) {
        for (_, handle) in self.lock_handles().drain() {
            handle.abort();
        }
    }

    /// Loads started and not yet finished
    pub fn in_flight(&self) -> usize {
        self.lock_handles().len()
    }

    /// Last committed state
    pub fn current(&self) -> Option<S> {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_handles(&self) -> std::sync::MutexGuard<'_, HashMap<u64, AbortHandle>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct HandleSlot<'a, S> {
    scope: &'a ViewScope<S>,
    id: u64,
}

impl<S> Drop for HandleSlot<'_, S> {
    fn drop(&mut self) {
        self.scope
            .handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

/// Validation message with its display window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedError {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl TimedError {
    pub fn new(message: impl Into<String>, raised_at: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            raised_at,
        }
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.clears_at()
    }

    pub fn clears_at(&self) -> DateTime<Utc> {
        self.raised_at + Duration::seconds(ERROR_DISPLAY_SECS as i64)
    }
}

/// One save of one profile section: guard, validate, update, mark complete.
pub struct FormSubmission<'a> {
    gateway: &'a dyn DataGateway,
    store: &'a SessionStore,
    session: &'a Session,
    section: ProfileSection,
}

impl<'a> FormSubmission<'a> {
    pub fn new(
        gateway: &'a dyn DataGateway,
        store: &'a SessionStore,
        session: &'a Session,
        section: ProfileSection,
    ) -> Self {
        Self {
            gateway,
            store,
            session,
            section,
        }
    }

    /// `validate` runs before anything touches the gateway; a failing check
    /// never builds or sends the update.
    pub async fn submit<V, B>(self, validate: V, build: B) -> Result<UpdateResponse, AppError>
    where
        V: FnOnce() -> Result<(), AppError>,
        B: FnOnce() -> Result<UpdateCommand, AppError>,
    {
        let guard = self.store.begin_submit(&self.session.user_id, self.section)?;

        validate()?;
        let command = build()?;

        let response = self
            .gateway
            .m_update(&command, &self.session.access_token)
            .await
            .map_err(|e| {
                log::error!(
                    "❌ Save of {:?} failed for user {}: {}",
                    self.section,
                    self.session.user_id,
                    e
                );
                AppError::from(e)
            })?;

        if !guard.mark_complete() {
            log::info!("👋 {:?} saved after logout of {}", self.section, self.session.user_id);
        }
        log::info!(
            "✅ {:?} saved for user {} (modified: {:?})",
            self.section,
            self.session.user_id,
            response.modified_count
        );
        Ok(response)
    }
}
