use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::SummaryError;
use crate::keypoint::KeyPoint;
use crate::parser::SummaryResult;
use crate::summarize::Summary;

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub result: Option<SummaryResult>,
    pub markdown: Option<String>,
    pub file_name: Option<String>,
    pub error: Option<String>,
    pub busy: bool,
    pub key_point: Option<KeyPoint>,
    pub translation: Option<String>,
    pub show_word_count: bool,
    #[serde(skip)]
    ticket: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

struct Entry {
    state: SessionState,
    touched: Instant,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    next_ticket: AtomicU64,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_ticket: AtomicU64::new(1),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn snapshot(&self, id: &str) -> SessionState {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    pub async fn begin(&self, id: &str) -> Result<Ticket, SummaryError> {
        let mut sessions = self.sessions.write().await;
        let state = self.entry(&mut sessions, id);
        if state.busy {
            return Err(SummaryError::Busy);
        }
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        state.busy = true;
        state.ticket = ticket;
        state.result = None;
        state.markdown = None;
        state.file_name = None;
        state.error = None;
        Ok(Ticket(ticket))
    }

    // Stale tickets (the session was cleared or evicted meanwhile) are dropped.
    pub async fn finish(&self, id: &str, ticket: Ticket, outcome: &Result<Summary, SummaryError>) {
        let mut sessions = self.sessions.write().await;
        let Some(entry) = sessions.get_mut(id) else { return };
        if !entry.state.busy || entry.state.ticket != ticket.0 {
            return;
        }
        entry.touched = Instant::now();
        let state = &mut entry.state;
        state.busy = false;
        match outcome {
            Ok(summary) => {
                state.result = Some(summary.result.clone());
                state.markdown = Some(summary.markdown.clone());
                state.file_name = Some(summary.file_name.clone());
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    pub async fn update<F>(&self, id: &str, f: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let mut sessions = self.sessions.write().await;
        f(self.entry(&mut sessions, id));
    }

    pub async fn clear(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn entry<'a>(&self, sessions: &'a mut HashMap<String, Entry>, id: &str) -> &'a mut SessionState {
        let now = Instant::now();
        if !sessions.contains_key(id) {
            self.make_room(sessions, now);
        }
        let entry = sessions
            .entry(id.to_string())
            .or_insert_with(|| Entry { state: SessionState::default(), touched: now });
        entry.touched = now;
        &mut entry.state
    }

    // Busy sessions are never evicted; their spawned task still has to land.
    fn make_room(&self, sessions: &mut HashMap<String, Entry>, now: Instant) {
        let ttl = self.idle_ttl;
        sessions.retain(|_, e| e.state.busy || now.duration_since(e.touched) < ttl);
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .filter(|(_, e)| !e.state.busy)
                .min_by_key(|(_, e)| e.touched)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(key) => {
                    sessions.remove(&key);
                }
                None => break,
            }
        }
    }
}
