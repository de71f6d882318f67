//! Debounced email-availability probe.
//!
//! Uniqueness can only be answered by the profile store, so this check is
//! asynchronous and must survive out-of-order replies: every edit bumps a
//! generation counter, and a scheduled check applies its verdict only while
//! its generation is still the latest. A superseded check is discarded
//! silently, never reported as an error. Store failures are indeterminate
//! and fail open: they log a warning and leave the state `Unknown`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::EmailAddress;
use crate::ports::ProfileStore;

/// Debounce window between the last email edit and the store query.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Availability of the most recently edited email value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailAvailability {
    /// No verdict: unchecked, superseded, or the check failed.
    Unknown,
    /// A check for the current value is in flight.
    Checking,
    /// No existing profile uses this email.
    Available,
    /// An existing profile already uses this email.
    Taken,
}

/// Published availability state, tied to the email value it describes.
///
/// `Taken` is a distinct signal from a format error so a UI can react
/// differently (attention cue vs. inline message); `Available` is the
/// positive confirmation counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    /// The (trimmed) email value this state belongs to.
    pub email: String,
    /// Current verdict for that value.
    pub availability: EmailAvailability,
}

impl AvailabilitySnapshot {
    fn unknown(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            availability: EmailAvailability::Unknown,
        }
    }
}

struct Inner<P> {
    profiles: Arc<P>,
    debounce: Duration,
    generation: AtomicU64,
    snapshot: watch::Sender<AvailabilitySnapshot>,
}

/// Debounced, race-safe availability checker for one form instance.
///
/// Owned by whichever caller edits the email field; clones share state.
pub struct AvailabilityChecker<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for AvailabilityChecker<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> AvailabilityChecker<P>
where
    P: ProfileStore + 'static,
{
    /// Checker with the default debounce window.
    pub fn new(profiles: Arc<P>) -> Self {
        Self::with_debounce(profiles, DEFAULT_DEBOUNCE)
    }

    /// Checker with a custom debounce window.
    pub fn with_debounce(profiles: Arc<P>, debounce: Duration) -> Self {
        let (snapshot, _) = watch::channel(AvailabilitySnapshot::unknown(""));
        Self {
            inner: Arc::new(Inner {
                profiles,
                debounce,
                generation: AtomicU64::new(0),
                snapshot,
            }),
        }
    }

    /// Latest published state.
    pub fn current(&self) -> AvailabilitySnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AvailabilitySnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Record an edit to the email field.
    ///
    /// Supersedes any in-flight check and resets the published state to
    /// `Unknown`. A new check is scheduled after the debounce window only
    /// when the value is a syntactically valid address; there is no point
    /// querying the store about text the synchronous rules already reject.
    pub fn note_edit(&self, email: &str) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let raw = email.trim().to_owned();
        self.inner
            .snapshot
            .send_replace(AvailabilitySnapshot::unknown(raw.clone()));

        let Ok(parsed) = EmailAddress::parse(&raw) else {
            return;
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!(email = %raw, "debounced availability check superseded before it ran");
                return;
            }

            inner.snapshot.send_replace(AvailabilitySnapshot {
                email: raw.clone(),
                availability: EmailAvailability::Checking,
            });

            let result = inner.profiles.query_profiles_by_email(&parsed).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!(email = %raw, "discarding stale availability verdict");
                return;
            }

            let availability = match result {
                Ok(hits) if hits.is_empty() => EmailAvailability::Available,
                Ok(_) => EmailAvailability::Taken,
                Err(error) => {
                    // Indeterminate: do not block submission on a store
                    // outage.
                    warn!(%error, email = %raw, "email availability check failed");
                    EmailAvailability::Unknown
                }
            };
            inner.snapshot.send_replace(AvailabilitySnapshot {
                email: raw,
                availability,
            });
        });
    }
}
