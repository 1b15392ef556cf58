// Estado compartilhado do portal: substitui as chaves `pendingUser` e
// `completionStatus` que o front end guardava no localStorage.
// Criado uma vez no startup e injetado via web::Data.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::ProfileSection;
use crate::services::lifecycle::ViewScope;
use crate::utils::AppError;

const PENDING_SIGNUP_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
struct PendingSignup {
    ticket: Uuid,
    payload: Value,
    created_at: Instant,
}

pub type CompletionStatus = BTreeMap<ProfileSection, bool>;

pub struct SessionStore {
    pending: RwLock<HashMap<String, PendingSignup>>,
    completion: RwLock<HashMap<String, CompletionStatus>>,
    // bumped on every logout; writes started before it are discarded
    generations: Mutex<HashMap<String, u64>>,
    in_flight: Mutex<HashSet<(String, ProfileSection)>>,
    scopes: Mutex<HashMap<String, Arc<ViewScope<()>>>>,
    pending_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_pending_ttl(PENDING_SIGNUP_TTL)
    }

    pub fn with_pending_ttl(pending_ttl: Duration) -> Self {
        Self {
            pending: RwLock::new(HashMap::new()),
            completion: RwLock::new(HashMap::new()),
            generations: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            scopes: Mutex::new(HashMap::new()),
            pending_ttl,
        }
    }

    // ---------- pending signups (aguardando OTP) ----------

    /// Keeps the signup payload until the OTP is verified; a new request replaces the old one.
    pub fn stash_pending(&self, email: &str, payload: Value) -> Uuid {
        let ticket = Uuid::new_v4();
        let mut pending = self.pending.write().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|_, p| p.created_at.elapsed() < self.pending_ttl);
        pending.insert(
            email_key(email),
            PendingSignup {
                ticket,
                payload,
                created_at: Instant::now(),
            },
        );
        ticket
    }

    pub fn has_pending(&self, email: &str) -> bool {
        self.pending
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&email_key(email))
            .map_or(false, |p| p.created_at.elapsed() < self.pending_ttl)
    }

    /// Removes and returns the payload; expired entries are dropped and reported as missing.
    pub fn take_pending(&self, email: &str) -> Option<Value> {
        let entry = self
            .pending
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&email_key(email))?;

        if entry.created_at.elapsed() >= self.pending_ttl {
            log::debug!("⌛ Pending signup {} expired", entry.ticket);
            return None;
        }
        Some(entry.payload)
    }

    /// Puts a payload back after a failed signup call so the user can retry.
    pub fn restore_pending(&self, email: &str, payload: Value) {
        self.stash_pending(email, payload);
    }

    // ---------- completion flags ----------

    pub fn completion(&self, user_id: &str) -> CompletionStatus {
        self.completion
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_complete(&self, user_id: &str, section: ProfileSection) -> bool {
        self.completion(user_id).get(&section).copied().unwrap_or(false)
    }

    /// Logout generation of a user, captured before a save or load starts
    pub fn generation(&self, user_id: &str) -> u64 {
        self.generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .copied()
            .unwrap_or(0)
    }

    /// Marks a section done unless the user logged out since `generation`.
    pub fn mark_complete(&self, user_id: &str, generation: u64, section: ProfileSection) -> bool {
        let mut status = CompletionStatus::new();
        status.insert(section, true);
        self.overwrite_completion(user_id, generation, status)
    }

    /// A fresh fetch is authoritative: its flags overwrite whatever was stored.
    /// Dropped when the user logged out after `generation` was taken.
    pub fn overwrite_completion(
        &self,
        user_id: &str,
        generation: u64,
        status: CompletionStatus,
    ) -> bool {
        let mut completion = self.completion.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation(user_id) != generation {
            log::debug!("🛑 Discarding completion flags of {} after logout", user_id);
            return false;
        }
        completion.entry(user_id.to_string()).or_default().extend(status);
        true
    }

    // ---------- submissões em andamento ----------

    /// Server-side "isProcessing": one in-flight save per user and section.
    pub fn begin_submit(
        &self,
        user_id: &str,
        section: ProfileSection,
    ) -> Result<SubmitGuard<'_>, AppError> {
        let key = (user_id.to_string(), section);
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(key.clone()) {
            return Err(AppError::Conflict(
                "A save for this section is already in progress".to_string(),
            ));
        }
        Ok(SubmitGuard {
            store: self,
            generation: self.generation(user_id),
            key,
        })
    }

    /// Scope of the user's in-flight loads, torn down on logout
    pub fn view_scope(&self, user_id: &str) -> Arc<ViewScope<()>> {
        self.scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(ViewScope::new()))
            .clone()
    }

    /// Explicit logout teardown
    pub fn logout(&self, user_id: &str) {
        if let Some(scope) = self
            .scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id)
        {
            scope.teardown();
        }
        // mesma ordem de locks que overwrite_completion: completion, depois generations
        let mut completion = self.completion.write().unwrap_or_else(PoisonError::into_inner);
        *self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id.to_string())
            .or_insert(0) += 1;
        completion.remove(user_id);
        log::info!("👋 Session state cleared for user {}", user_id);
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Releases the in-flight slot when dropped. Completion writes made through
/// the guard are ignored once the user has logged out.
pub struct SubmitGuard<'a> {
    store: &'a SessionStore,
    generation: u64,
    key: (String, ProfileSection),
}

impl SubmitGuard<'_> {
    pub fn mark_complete(&self) -> bool {
        self.store.mark_complete(&self.key.0, self.generation, self.key.1)
    }

    pub fn overwrite_completion(&self, status: CompletionStatus) -> bool {
        self.store.overwrite_completion(&self.key.0, self.generation, status)
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.store
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
