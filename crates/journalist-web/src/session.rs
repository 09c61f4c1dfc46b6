//! Per-browser session state.
//!
//! A session is created on the first successful login, identified by a
//! random cookie, reset on logout, and dropped after sitting idle longer
//! than the TTL. Anonymous visitors are never stored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use chrono::{DateTime, Utc};
use journalist_rs::agent::newsroom::Drafts;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::form::FormState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "journalist_session";

/// How often idle sessions are swept when the TTL is longer than this.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A one-shot message shown on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// Everything the server remembers about one browser.
#[derive(Debug, Clone)]
pub struct Session {
    pub logged_in: bool,
    /// Bumped on every login so results from an earlier login are dropped.
    pub epoch: u64,
    /// A newsroom run is going for this browser. Survives logout and login;
    /// only the run itself clears it.
    pub in_flight: bool,
    pub form: FormState,
    pub drafts: Option<Drafts>,
    pub flash: Option<Flash>,
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            logged_in: false,
            epoch: 0,
            in_flight: false,
            form: FormState::default(),
            drafts: None,
            flash: None,
            last_seen: now,
        }
    }

    /// Transition to logged in.
    pub fn login(&mut self) {
        self.logged_in = true;
        self.epoch += 1;
        self.drafts = None;
        self.form = FormState::default();
    }

    /// Transition to logged out, discarding everything but the epoch and
    /// the in-flight marker.
    pub fn logout(&mut self) {
        let (epoch, in_flight) = (self.epoch, self.in_flight);
        *self = Self::new(self.last_seen);
        self.epoch = epoch;
        self.in_flight = in_flight;
    }

    /// Whether a generation started under `epoch` may still store its result.
    pub fn accepts_result(&self, epoch: u64) -> bool {
        self.logged_in && self.epoch == epoch
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    /// Idle longer than `ttl` at `now`. A clock step backwards counts as fresh.
    fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_seen).to_std().is_ok_and(|age| age > ttl)
    }
}

/// Shared map of live sessions.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return `id` if it names a live session, marking it as seen.
    ///
    /// Never creates anything, so requests without a cookie cost no memory.
    pub fn lookup(&self, id: Option<Uuid>) -> Option<Uuid> {
        self.lookup_at(id?, Utc::now())
    }

    pub(crate) fn lookup_at(&self, id: Uuid, now: DateTime<Utc>) -> Option<Uuid> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id)?;
        if session.expired(now, self.ttl) && !session.in_flight {
            sessions.remove(&id);
            debug!("Session {id} expired");
            return None;
        }
        session.last_seen = now;
        Some(id)
    }

    /// Return the live session named by `id`, or store a fresh one.
    ///
    /// Only called once credentials have been checked.
    pub fn open(&self, id: Option<Uuid>) -> Uuid {
        self.open_at(id, Utc::now())
    }

    pub(crate) fn open_at(&self, id: Option<Uuid>, now: DateTime<Utc>) -> Uuid {
        if let Some(id) = id
            && let Some(id) = self.lookup_at(id, now)
        {
            return id;
        }
        let id = Uuid::new_v4();
        self.lock().insert(id, Session::new(now));
        debug!("Session {id} created");
        id
    }

    /// Drop idle sessions. Sessions with a run in flight are kept until it
    /// finishes. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub(crate) fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, s| s.in_flight || !s.expired(now, self.ttl));
        before - sessions.len()
    }

    /// Sweep idle sessions in the background until the runtime shuts down.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let store = self.clone();
        let period = self.ttl.clamp(Duration::from_secs(1), SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            loop {
                ticks.tick().await;
                let dropped = store.purge_expired();
                if dropped > 0 {
                    debug!("Swept {dropped} idle session(s)");
                }
            }
        })
    }

    /// Run `f` against a session if it still exists.
    pub fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(f)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Read the session id from the request's `Cookie` header(s).
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
