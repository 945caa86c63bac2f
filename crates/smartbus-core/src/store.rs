//! OTP session store.
//!
//! [`OtpStore`] owns every in-flight verification session and is the only
//! component that decides whether a submitted code is accepted.
//!
//! # Concurrency
//!
//! Sessions live in a sharded [`DashMap`]. Each verify runs its whole
//! lookup → expiry check → attempt check → mutate-or-delete sequence while
//! holding that phone number's entry lock, so concurrent verifies for one
//! number are serialized and never lose an attempt. Numbers in other shards
//! proceed in parallel.
//!
//! No lock is held across an `.await`. Issuing delivers the code first and
//! then installs the new session under the entry lock, so a verify always
//! sees either the old session or the new one. Each delivery takes a
//! sequence number when it completes, and a session never replaces one with
//! a higher number: when two issues for one phone overlap, the stored code is
//! the one whose SMS was sent last.
//!
//! # Eviction
//!
//! Eviction is lazy: an expired or exhausted session is removed by the next
//! verify that touches it. [`OtpStore::purge_expired`] (and the optional
//! sweeper task) only reclaims sessions past their TTL, so a sweep never
//! changes what the next verify returns beyond `Expired` becoming
//! `SessionNotFound`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::clock::{Clock, SystemClock};
use crate::code::{CodeGenerator, OtpCode, RandomCodeGenerator};
use crate::delivery::DeliveryGateway;
use crate::error::{OtpError, Result};
use crate::phone::{mask, PhoneNumber};

/// Limits applied to every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// How long a code stays valid after issuance.
    pub ttl: Duration,
    /// Failed verifications allowed before the session is exhausted.
    pub max_attempts: u32,
    /// Upper bound on a single gateway call.
    pub delivery_timeout: Duration,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_attempts: 3,
            delivery_timeout: Duration::from_secs(10),
        }
    }
}

impl OtpPolicy {
    /// Human-readable validity period used in the SMS text.
    #[must_use]
    pub fn describe_ttl(&self) -> String {
        let secs = self.ttl.as_secs();
        match (secs / 60, secs % 60) {
            (1, 0) => "1 minute".to_string(),
            (minutes, 0) => format!("{minutes} minutes"),
            _ => format!("{secs} seconds"),
        }
    }
}

/// In-flight verification state for one phone number.
#[derive(Debug, Clone)]
struct OtpSession {
    code: OtpCode,
    created_at: DateTime<Utc>,
    attempts: u32,
    sequence: u64,
}

impl OtpSession {
    const fn new(code: OtpCode, created_at: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            code,
            created_at,
            attempts: 0,
            sequence,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // A negative age (clock stepped back) converts to Err and counts as fresh.
        (now - self.created_at).to_std().is_ok_and(|age| age > ttl)
    }

    const fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }
}

/// Proof that a phone number completed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "phoneNumber": "9876543210",
    "verifiedAt": "2025-01-15T03:30:00Z"
}))]
pub struct VerifiedIdentity {
    /// The verified phone number.
    #[schema(example = "9876543210")]
    pub phone_number: String,

    /// When verification succeeded (UTC).
    #[schema(example = "2025-01-15T03:30:00Z")]
    pub verified_at: DateTime<Utc>,
}

/// Phone number → session map plus the rules for issuing and checking codes.
pub struct OtpStore {
    sessions: DashMap<String, OtpSession>,
    deliveries: AtomicU64,
    generator: Arc<dyn CodeGenerator>,
    gateway: Arc<dyn DeliveryGateway>,
    clock: Arc<dyn Clock>,
    policy: OtpPolicy,
}

impl OtpStore {
    /// Create a store that delivers through `gateway`, using random codes and wall-clock time.
    #[must_use]
    pub fn new(gateway: Arc<dyn DeliveryGateway>, policy: OtpPolicy) -> Self {
        Self {
            sessions: DashMap::new(),
            deliveries: AtomicU64::new(0),
            generator: Arc::new(RandomCodeGenerator),
            gateway,
            clock: Arc::new(SystemClock),
            policy,
        }
    }

    /// Replace the code generator.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The policy this store enforces.
    #[must_use]
    pub const fn policy(&self) -> &OtpPolicy {
        &self.policy
    }

    /// Number of sessions currently held, including stale ones not yet evicted.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Generate a code, deliver it, and start a fresh session for `phone_number`.
    ///
    /// Any existing session for the number is replaced outright, resetting its
    /// attempts and expiry. If delivery fails or times out, nothing changes.
    /// The code is never returned.
    ///
    /// # Errors
    ///
    /// - [`OtpError::InvalidPhoneNumber`] if the number is not 10 ASCII digits
    ///   (no code is generated and the gateway is not called)
    /// - [`OtpError::DeliveryFailed`] if the gateway fails or exceeds the timeout
    pub async fn issue_code(&self, phone_number: &str) -> Result<()> {
        let phone = PhoneNumber::parse(phone_number).map_err(|err| {
            debug!(phone = %mask(phone_number), "Rejected malformed phone number");
            err
        })?;

        let code = self.generator.generate();
        let message = format!(
            "Your SmartBus verification code is: {code}. Valid for {}.",
            self.policy.describe_ttl()
        );

        let delivery = tokio::time::timeout(
            self.policy.delivery_timeout,
            self.gateway.send(&phone, &message),
        )
        .await;

        match delivery {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(
                    phone = %phone.masked(),
                    gateway = self.gateway.name(),
                    error = %err,
                    "OTP delivery failed"
                );
                return Err(OtpError::DeliveryFailed);
            }
            Err(_) => {
                error!(
                    phone = %phone.masked(),
                    gateway = self.gateway.name(),
                    timeout_ms = self.policy.delivery_timeout.as_millis(),
                    "OTP delivery timed out"
                );
                return Err(OtpError::DeliveryFailed);
            }
        }

        let sequence = self.deliveries.fetch_add(1, Ordering::SeqCst);
        self.install(&phone, OtpSession::new(code, self.clock.now(), sequence));
        Ok(())
    }

    /// Store `session` unless a later delivery already stored one for this number.
    fn install(&self, phone: &PhoneNumber, session: OtpSession) {
        match self.sessions.entry(phone.as_str().to_owned()) {
            Entry::Occupied(mut entry) => {
                if entry.get().sequence > session.sequence {
                    debug!(phone = %phone.masked(), "OTP superseded by a later delivery");
                    return;
                }
                entry.insert(session);
                info!(phone = %phone.masked(), replaced = true, "OTP issued");
            }
            Entry::Vacant(entry) => {
                entry.insert(session);
                info!(phone = %phone.masked(), replaced = false, "OTP issued");
            }
        }
    }

    /// Check `submitted_code` against the session for `phone_number`.
    ///
    /// On success the session is consumed. On a mismatch the attempt counter
    /// grows and the session is kept. An exhausted session is evicted by the
    /// next call.
    ///
    /// # Errors
    ///
    /// - [`OtpError::MissingFields`] if either argument is empty
    /// - [`OtpError::SessionNotFound`] if no session exists
    /// - [`OtpError::Expired`] if the session is past its TTL (session evicted)
    /// - [`OtpError::AttemptsExhausted`] if the attempt limit was reached (session evicted)
    /// - [`OtpError::InvalidCode`] if the code does not match
    pub fn verify_code(&self, phone_number: &str, submitted_code: &str) -> Result<VerifiedIdentity> {
        if phone_number.is_empty() || submitted_code.is_empty() {
            return Err(OtpError::MissingFields);
        }

        let now = self.clock.now();
        let ttl = self.policy.ttl;
        let max_attempts = self.policy.max_attempts;

        // The entry guard holds the shard lock until this function returns.
        let mut entry = match self.sessions.entry(phone_number.to_owned()) {
            Entry::Occupied(entry) => entry,
            Entry::Vacant(_) => {
                debug!(phone = %mask(phone_number), "No OTP session for phone number");
                return Err(OtpError::SessionNotFound);
            }
        };

        if entry.get().is_expired(now, ttl) {
            entry.remove();
            info!(phone = %mask(phone_number), "OTP session expired");
            return Err(OtpError::Expired);
        }

        if entry.get().is_exhausted(max_attempts) {
            entry.remove();
            warn!(phone = %mask(phone_number), max_attempts, "OTP session exhausted, evicting");
            return Err(OtpError::AttemptsExhausted);
        }

        if !entry.get().code.matches(submitted_code) {
            let session = entry.get_mut();
            session.attempts += 1;
            let remaining = max_attempts.saturating_sub(session.attempts);
            warn!(
                phone = %mask(phone_number),
                attempts = session.attempts,
                remaining,
                "Invalid OTP submitted"
            );
            return Err(OtpError::InvalidCode { remaining });
        }

        entry.remove();
        info!(phone = %mask(phone_number), "OTP verified");
        Ok(VerifiedIdentity {
            phone_number: phone_number.to_owned(),
            verified_at: now,
        })
    }

    /// Drop every session past its TTL. Returns how many were removed.
    ///
    /// Exhausted sessions are kept so the next verify still reports
    /// [`OtpError::AttemptsExhausted`]; they expire with everything else.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.policy.ttl;

        let mut purged = 0;
        self.sessions.retain(|_, session| {
            let keep = !session.is_expired(now, ttl);
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    /// Run [`OtpStore::purge_expired`] every `every` until the task is aborted.
    pub fn spawn_sweeper(store: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let purged = store.purge_expired();
                if purged > 0 {
                    debug!(purged, remaining = store.active_sessions(), "Swept stale OTP sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;

    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::code::SequenceCodeGenerator;
    use crate::delivery::RecordingGateway;

    const PHONE: &str = "9876543210";

    struct Harness {
        store: OtpStore,
        gateway: Arc<RecordingGateway>,
        clock: ManualClock,
    }

    fn harness_with(codes: impl IntoIterator<Item = u32>, policy: OtpPolicy) -> Harness {
        let gateway = Arc::new(RecordingGateway::new());
        let clock = ManualClock::default();
        let store = OtpStore::new(gateway.clone(), policy)
            .with_generator(Arc::new(SequenceCodeGenerator::new(codes)))
            .with_clock(Arc::new(clock.clone()));
        Harness {
            store,
            gateway,
            clock,
        }
    }

    fn harness() -> Harness {
        harness_with([123_456, 654_321], OtpPolicy::default())
    }

    #[tokio::test]
    async fn test_issue_then_verify_succeeds_once() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        let identity = h.store.verify_code(PHONE, "123456").unwrap();
        assert_eq!(identity.phone_number, PHONE);
        assert_eq!(identity.verified_at, h.clock.now());

        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::SessionNotFound)
        );
        assert_eq!(h.store.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_random_code_round_trip_through_gateway() {
        let gateway = Arc::new(RecordingGateway::new());
        let store = OtpStore::new(gateway.clone(), OtpPolicy::default());

        store.issue_code(PHONE).await.unwrap();
        let code = gateway.last_code_for(PHONE).unwrap();

        assert!(store.verify_code(PHONE, &code).is_ok());
    }

    #[tokio::test]
    async fn test_delivery_message() {
        let h = harness_with([42], OtpPolicy::default());
        h.store.issue_code(PHONE).await.unwrap();

        let sent = h.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone_number, PHONE);
        assert_eq!(
            sent[0].message,
            "Your SmartBus verification code is: 000042. Valid for 5 minutes."
        );
    }

    #[tokio::test]
    async fn test_wrong_codes_then_exhausted() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        assert_eq!(
            h.store.verify_code(PHONE, "000000"),
            Err(OtpError::InvalidCode { remaining: 2 })
        );
        assert_eq!(
            h.store.verify_code(PHONE, "000000"),
            Err(OtpError::InvalidCode { remaining: 1 })
        );
        assert_eq!(
            h.store.verify_code(PHONE, "000000"),
            Err(OtpError::InvalidCode { remaining: 0 })
        );
        // Even the right code is refused once the limit is reached.
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::AttemptsExhausted)
        );
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::SessionNotFound)
        );
    }

    #[tokio::test]
    async fn test_correct_code_after_wrong_attempt() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        assert!(h.store.verify_code(PHONE, "111111").is_err());
        assert!(h.store.verify_code(PHONE, "123456").is_ok());
    }

    #[tokio::test]
    async fn test_expired_after_ttl() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        h.clock.advance(ChronoDuration::seconds(301));

        assert_eq!(h.store.verify_code(PHONE, "123456"), Err(OtpError::Expired));
        assert_eq!(h.store.active_sessions(), 0);
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::SessionNotFound)
        );
    }

    #[tokio::test]
    async fn test_valid_at_exact_ttl() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        h.clock.advance(ChronoDuration::seconds(300));

        assert!(h.store.verify_code(PHONE, "123456").is_ok());
    }

    #[tokio::test]
    async fn test_expiry_checked_before_code() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        h.clock.advance(ChronoDuration::minutes(10));

        assert_eq!(h.store.verify_code(PHONE, "000000"), Err(OtpError::Expired));
    }

    #[tokio::test]
    async fn test_reissue_resets_attempts_and_replaces_code() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();
        h.store.verify_code(PHONE, "000000").unwrap_err();
        h.store.verify_code(PHONE, "000000").unwrap_err();

        h.store.issue_code(PHONE).await.unwrap();
        assert_eq!(h.store.active_sessions(), 1);

        // Old code: the session row still exists, so this is a mismatch.
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::InvalidCode { remaining: 2 })
        );
        assert!(h.store.verify_code(PHONE, "654321").is_ok());
    }

    #[tokio::test]
    async fn test_reissue_resets_expiry() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        h.clock.advance(ChronoDuration::seconds(240));
        h.store.issue_code(PHONE).await.unwrap();
        h.clock.advance(ChronoDuration::seconds(240));

        assert!(h.store.verify_code(PHONE, "654321").is_ok());
    }

    #[tokio::test]
    async fn test_malformed_numbers_never_reach_gateway() {
        let h = harness();

        for phone in ["12345", "abcdefghij", "12345678901", "", "98765-4321"] {
            assert_eq!(
                h.store.issue_code(phone).await,
                Err(OtpError::InvalidPhoneNumber),
                "{phone:?} should be rejected"
            );
        }

        assert_eq!(h.gateway.call_count(), 0);
        assert_eq!(h.store.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let h = harness();
        assert_eq!(h.store.verify_code("", "123456"), Err(OtpError::MissingFields));
        assert_eq!(h.store.verify_code(PHONE, ""), Err(OtpError::MissingFields));
    }

    #[tokio::test]
    async fn test_never_issued() {
        let h = harness();
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::SessionNotFound)
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_persists_nothing() {
        let h = harness();
        h.gateway.fail();

        assert_eq!(h.store.issue_code(PHONE).await, Err(OtpError::DeliveryFailed));
        assert_eq!(h.gateway.call_count(), 1);
        assert_eq!(h.store.active_sessions(), 0);
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::SessionNotFound)
        );
    }

    #[tokio::test]
    async fn test_failed_reissue_keeps_previous_session() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        h.gateway.fail();
        assert_eq!(h.store.issue_code(PHONE).await, Err(OtpError::DeliveryFailed));

        assert!(h.store.verify_code(PHONE, "123456").is_ok());
    }

    #[tokio::test]
    async fn test_delivery_timeout() {
        let policy = OtpPolicy {
            delivery_timeout: Duration::from_millis(50),
            ..OtpPolicy::default()
        };
        let h = harness_with([123_456], policy);
        h.gateway.stall(Duration::from_secs(5));

        assert_eq!(h.store.issue_code(PHONE).await, Err(OtpError::DeliveryFailed));
        assert_eq!(h.store.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_sessions_are_per_phone_number() {
        let h = harness_with([111_111, 222_222], OtpPolicy::default());
        h.store.issue_code("1111111111").await.unwrap();
        h.store.issue_code("2222222222").await.unwrap();

        assert_eq!(
            h.store.verify_code("1111111111", "222222"),
            Err(OtpError::InvalidCode { remaining: 2 })
        );
        assert!(h.store.verify_code("2222222222", "222222").is_ok());
        assert!(h.store.verify_code("1111111111", "111111").is_ok());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let h = harness_with([1, 2, 3], OtpPolicy::default());
        h.store.issue_code("1111111111").await.unwrap();
        h.clock.advance(ChronoDuration::seconds(200));
        h.store.issue_code("2222222222").await.unwrap();
        h.store.issue_code("3333333333").await.unwrap();
        for _ in 0..3 {
            h.store.verify_code("3333333333", "999999").unwrap_err();
        }

        h.clock.advance(ChronoDuration::seconds(101));

        assert_eq!(h.store.purge_expired(), 1);
        assert_eq!(h.store.active_sessions(), 2);
        assert_eq!(
            h.store.verify_code("1111111111", "000001"),
            Err(OtpError::SessionNotFound)
        );
        assert!(h.store.verify_code("2222222222", "000002").is_ok());
    }

    #[tokio::test]
    async fn test_purge_keeps_exhausted_session() {
        let h = harness_with([123_456], OtpPolicy::default());
        h.store.issue_code(PHONE).await.unwrap();
        for _ in 0..3 {
            h.store.verify_code(PHONE, "000000").unwrap_err();
        }

        assert_eq!(h.store.purge_expired(), 0);
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::AttemptsExhausted)
        );
        assert_eq!(
            h.store.verify_code(PHONE, "123456"),
            Err(OtpError::SessionNotFound)
        );
    }

    #[test]
    fn test_late_insert_does_not_replace_newer_delivery() {
        let h = harness_with([1], OtpPolicy::default());
        let phone = PhoneNumber::parse(PHONE).unwrap();
        let now = h.clock.now();

        h.store
            .install(&phone, OtpSession::new(OtpCode::from_value(222_222), now, 7));
        h.store
            .install(&phone, OtpSession::new(OtpCode::from_value(111_111), now, 6));

        assert_eq!(
            h.store.verify_code(PHONE, "111111"),
            Err(OtpError::InvalidCode { remaining: 2 })
        );
        assert!(h.store.verify_code(PHONE, "222222").is_ok());
    }

    #[test]
    fn test_describe_ttl() {
        let policy = |secs| OtpPolicy {
            ttl: Duration::from_secs(secs),
            ..OtpPolicy::default()
        };
        assert_eq!(policy(300).describe_ttl(), "5 minutes");
        assert_eq!(policy(60).describe_ttl(), "1 minute");
        assert_eq!(policy(90).describe_ttl(), "90 seconds");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_wrong_attempts_are_serialized() {
        let h = harness();
        h.store.issue_code(PHONE).await.unwrap();

        let callers = 5;
        let barrier = Barrier::new(callers);
        let results: Vec<Result<VerifiedIdentity>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..callers)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        h.store.verify_code(PHONE, "000000")
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        let invalid: Vec<u32> = results
            .iter()
            .filter_map(|r| match r {
                Err(OtpError::InvalidCode { remaining }) => Some(*remaining),
                _ => None,
            })
            .collect();
        let exhausted = results
            .iter()
            .filter(|r| **r == Err(OtpError::AttemptsExhausted))
            .count();
        let not_found = results
            .iter()
            .filter(|r| **r == Err(OtpError::SessionNotFound))
            .count();

        let mut remaining = invalid.clone();
        remaining.sort_unstable();
        assert_eq!(remaining, vec![0, 1, 2]);
        assert_eq!(exhausted, 1);
        assert_eq!(not_found, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issue_leaves_one_session() {
        let gateway = Arc::new(RecordingGateway::new());
        let store = Arc::new(OtpStore::new(gateway.clone(), OtpPolicy::default()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.issue_code(PHONE).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.active_sessions(), 1);
        assert_eq!(gateway.call_count(), 8);
    }

    #[tokio::test]
    async fn test_sweeper_purges_in_background() {
        let h = harness_with([1], OtpPolicy::default());
        let clock = h.clock.clone();
        let store = Arc::new(h.store);
        store.issue_code(PHONE).await.unwrap();
        clock.advance(ChronoDuration::minutes(6));

        let sweeper = OtpStore::spawn_sweeper(Arc::clone(&store), Duration::from_millis(10));
        for _ in 0..100 {
            if store.active_sessions() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        sweeper.abort();

        assert_eq!(store.active_sessions(), 0);
    }
}
