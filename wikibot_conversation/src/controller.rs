//! Session controller for the single active conversation.
//!
//! The controller is the only owner of the transcript, draft and pending
//! state. A submission is split around its one suspension point:
//! [`ConversationSessionController::begin_submit`] records the user turn and
//! hands back a [`PendingRequest`]; the request runs against a
//! [`QueryClient`]; [`ConversationSessionController::resolve`] applies the
//! [`Completion`]. Hosts that keep the controller on one task can run the
//! request elsewhere and feed the completion back, which lets
//! [`ConversationSessionController::start_new_session`] interleave with an
//! in-flight request.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use wikibot_core::{QueryClient, SessionLimits, SessionSummary, TransportError, Turn};

use crate::ledger::RecentSessionsLedger;
use crate::notification::Notification;
use crate::session::Transcript;

/// Identity of one submitted query, unique per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No request in flight; submission enabled.
    Idle,
    /// One request in flight; submission disabled.
    Awaiting { request: RequestId },
}

/// Why [`ConversationSessionController::begin_submit`] did nothing.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("draft is empty")]
    EmptySubmission,

    #[error("request {0} is still in flight")]
    RequestInFlight(RequestId),
}

/// A query ready to be sent, produced by a successful `begin_submit`.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: RequestId,
    pub query: String,
    /// Transcript as it stood before the user turn for `query`
    pub history: Vec<Turn>,
}

impl PendingRequest {
    /// Run the request once against `client`.
    pub async fn send_via<C>(self, client: &C) -> Completion
    where
        C: QueryClient + ?Sized,
    {
        let result = client.send(&self.query, &self.history).await;
        Completion {
            id: self.id,
            query: self.query,
            result,
        }
    }
}

/// Outcome of a [`PendingRequest`], to be fed back through `resolve`.
#[derive(Debug, Clone)]
pub struct Completion {
    pub id: RequestId,
    pub query: String,
    pub result: Result<String, TransportError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Reply appended and summarised into the ledger.
    Answered { summary_id: Uuid },
    /// Request failed; a notification was queued.
    Failed(TransportError),
    /// Completion belongs to a superseded request and was discarded.
    Stale,
}

/// Read-only view of controller state for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub transcript: Vec<Turn>,
    pub pending: bool,
    pub draft: String,
    pub recent_sessions: Vec<SessionSummary>,
}

pub struct ConversationSessionController<C = Arc<dyn QueryClient>>
where
    C: Send + Sync,
{
    client: C,
    limits: SessionLimits,
    transcript: Transcript,
    draft: String,
    state: SessionState,
    ledger: RecentSessionsLedger,
    notifications: Vec<Notification>,
    next_request: u64,
    /// Sessions started so far; display only, stale replies are matched by `RequestId`
    session_epoch: u64,
}

impl<C> ConversationSessionController<C>
where
    C: QueryClient + Send + Sync,
{
    pub fn new(client: C) -> Self {
        Self::with_limits(client, SessionLimits::default())
    }

    pub fn with_limits(client: C, limits: SessionLimits) -> Self {
        info!(
            "Creating session controller: ledger capacity {}, title {} chars, preview {} chars",
            limits.ledger_capacity, limits.title_max_chars, limits.preview_max_chars
        );
        Self {
            client,
            ledger: RecentSessionsLedger::with_capacity(limits.ledger_capacity),
            limits,
            transcript: Transcript::new(),
            draft: String::new(),
            state: SessionState::Idle,
            notifications: Vec::new(),
            next_request: 0,
            session_epoch: 0,
        }
    }

    /// Replace the draft input. Allowed in any state.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Clear transcript and draft and return to `Idle`.
    ///
    /// An in-flight request is not cancelled; its completion will resolve
    /// as [`Resolution::Stale`].
    pub fn start_new_session(&mut self) {
        if let SessionState::Awaiting { request } = self.state {
            info!("Starting new session; abandoning request {request}");
        } else {
            info!("Starting new session");
        }
        self.transcript.clear();
        self.draft.clear();
        self.state = SessionState::Idle;
        self.session_epoch += 1;
    }

    /// Record the draft as a user turn and move to `Awaiting`.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, SubmitRejected> {
        if let SessionState::Awaiting { request } = self.state {
            debug!("Ignoring submit while request {request} is in flight");
            return Err(SubmitRejected::RequestInFlight(request));
        }
        if self.draft.trim().is_empty() {
            debug!("Ignoring empty submission");
            return Err(SubmitRejected::EmptySubmission);
        }

        let query = std::mem::take(&mut self.draft);
        let history = self.transcript.turns().to_vec();
        self.transcript.push(Turn::user(query.clone()));

        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.state = SessionState::Awaiting { request: id };

        info!("Submitting request {id} with {} prior turns", history.len());

        Ok(PendingRequest { id, query, history })
    }

    /// Apply a completion. Only the request currently awaited is applied.
    pub fn resolve(&mut self, completion: Completion) -> Resolution {
        match self.state {
            SessionState::Awaiting { request } if request == completion.id => {}
            _ => {
                debug!("Discarding stale completion for request {}", completion.id);
                return Resolution::Stale;
            }
        }
        self.state = SessionState::Idle;

        match completion.result {
            Ok(reply) => {
                let summary =
                    SessionSummary::from_exchange(&completion.query, &reply, &self.limits);
                let summary_id = summary.id;
                self.transcript.push(Turn::assistant(reply));
                self.ledger.insert_front(summary);
                info!("Request {} answered", completion.id);
                Resolution::Answered { summary_id }
            }
            Err(e) => {
                warn!("Request {} failed: {e}", completion.id);
                self.notifications.push(Notification::request_failed());
                Resolution::Failed(e)
            }
        }
    }

    /// Submit the draft and wait for the reply in place.
    pub async fn submit(&mut self) -> Result<Resolution, SubmitRejected> {
        let pending = self.begin_submit()?;
        let completion = pending.send_via(&self.client).await;
        Ok(self.resolve(completion))
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            transcript: self.transcript.turns().to_vec(),
            pending: self.is_pending(),
            draft: self.draft.clone(),
            recent_sessions: self.ledger.list(),
        }
    }

    /// Take queued notifications; each is returned once.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, SessionState::Awaiting { .. })
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub const fn ledger(&self) -> &RecentSessionsLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn limits(&self) -> &SessionLimits {
        &self.limits
    }

    /// Number of times `start_new_session` has run.
    ///
    /// A plain counter for display. [`Self::resolve`] does not consult it.
    #[must_use]
    pub const fn session_epoch(&self) -> u64 {
        self.session_epoch
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }
}

impl<C> ConversationSessionController<C>
where
    C: QueryClient + Clone + Send + Sync + 'static,
{
    /// Detach `pending` from the controller so it can run on another task.
    pub fn dispatch(
        &self,
        pending: PendingRequest,
    ) -> Pin<Box<dyn Future<Output = Completion> + Send + 'static>> {
        let client = self.client.clone();
        Box::pin(async move { pending.send_via(&client).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use wikibot_core::Origin;

    /// Replies from a queue and records what it was asked.
    #[derive(Default)]
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, TransportError>>>,
        calls: Mutex<Vec<(String, Vec<Turn>)>>,
    }

    impl ScriptedClient {
        fn with_replies(replies: Vec<Result<String, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::default(),
            })
        }

        fn answering(n: usize) -> Arc<Self> {
            Self::with_replies((1..=n).map(|i| Ok(format!("reply {i}"))).collect())
        }

        fn calls(&self) -> Vec<(String, Vec<Turn>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryClient for ScriptedClient {
        async fn send(&self, query: &str, history: &[Turn]) -> Result<String, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), history.to_vec()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("no scripted reply".into())))
        }
    }

    fn contents(
        controller: &ConversationSessionController<Arc<ScriptedClient>>,
    ) -> Vec<(Origin, String)> {
        controller
            .transcript()
            .turns()
            .iter()
            .map(|t| (t.origin, t.content.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_single_exchange() {
        let client = ScriptedClient::with_replies(vec![Ok("X is Y.".to_string())]);
        let mut controller = ConversationSessionController::new(client.clone());

        controller.set_draft("What is X?");
        let resolution = controller.submit().await;

        assert!(matches!(resolution, Ok(Resolution::Answered { .. })));
        assert_eq!(
            contents(&controller),
            vec![
                (Origin::User, "What is X?".to_string()),
                (Origin::Assistant, "X is Y.".to_string()),
            ]
        );
        let recent = controller.ledger().list();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "What is X?");
        assert_eq!(recent[0].preview, "X is Y.");
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(controller.draft(), "");
    }

    #[tokio::test]
    async fn test_history_excludes_new_user_turn() {
        let client = ScriptedClient::answering(2);
        let mut controller = ConversationSessionController::new(client.clone());

        controller.set_draft("first");
        controller.submit().await.unwrap();
        controller.set_draft("second");
        controller.submit().await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "first");
        assert!(calls[0].1.is_empty());
        assert_eq!(calls[1].0, "second");
        let prior: Vec<&str> = calls[1].1.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(prior, vec!["first", "reply 1"]);
    }

    #[tokio::test]
    async fn test_many_successes_cap_ledger() {
        let client = ScriptedClient::answering(6);
        let mut controller = ConversationSessionController::new(client);

        for n in 1..=6 {
            controller.set_draft(format!("question {n}"));
            controller.submit().await.unwrap();
            assert_eq!(controller.transcript().len(), 2 * n);
            assert_eq!(controller.ledger().len(), n.min(5));
        }

        let titles: Vec<String> = controller
            .ledger()
            .list()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "question 6",
                "question 5",
                "question 4",
                "question 3",
                "question 2"
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_draft_is_noop() {
        let client = ScriptedClient::answering(1);
        let mut controller = ConversationSessionController::new(client.clone());

        for blank in ["", "   ", "\n\t "] {
            controller.set_draft(blank);
            assert_eq!(
                controller.submit().await.unwrap_err(),
                SubmitRejected::EmptySubmission
            );
        }

        assert!(controller.transcript().is_empty());
        assert!(controller.ledger().is_empty());
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_user_turn_and_notifies() {
        let client = ScriptedClient::with_replies(vec![Err(TransportError::Status(502))]);
        let mut controller = ConversationSessionController::new(client);

        controller.set_draft("hello?");
        let resolution = controller.submit().await.unwrap();

        assert_eq!(resolution, Resolution::Failed(TransportError::Status(502)));
        assert_eq!(contents(&controller), vec![(Origin::User, "hello?".to_string())]);
        assert!(controller.ledger().is_empty());
        assert_eq!(controller.state(), SessionState::Idle);

        let notes = controller.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::RequestFailed);
        assert!(controller.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_session_usable_after_failure() {
        let client = ScriptedClient::with_replies(vec![
            Err(TransportError::Request("offline".into())),
            Ok("back online".to_string()),
        ]);
        let mut controller = ConversationSessionController::new(client);

        controller.set_draft("try 1");
        controller.submit().await.unwrap();
        controller.set_draft("try 2");
        controller.submit().await.unwrap();

        assert_eq!(
            contents(&controller),
            vec![
                (Origin::User, "try 1".to_string()),
                (Origin::User, "try 2".to_string()),
                (Origin::Assistant, "back online".to_string()),
            ]
        );
        assert_eq!(controller.ledger().len(), 1);
    }

    #[test]
    fn test_user_turn_recorded_before_request() {
        let mut controller = ConversationSessionController::new(ScriptedClient::answering(1));

        controller.set_draft("  spaced query  ");
        let pending = controller.begin_submit().unwrap();

        assert_eq!(pending.query, "  spaced query  ");
        assert!(pending.history.is_empty());
        assert_eq!(
            contents(&controller),
            vec![(Origin::User, "  spaced query  ".to_string())]
        );
        assert!(controller.is_pending());
        assert!(controller.snapshot().pending);
        assert_eq!(controller.draft(), "");
    }

    #[test]
    fn test_second_submit_rejected_while_awaiting() {
        let mut controller = ConversationSessionController::new(ScriptedClient::answering(1));

        controller.set_draft("one");
        let pending = controller.begin_submit().unwrap();
        controller.set_draft("two");

        assert_eq!(
            controller.begin_submit().unwrap_err(),
            SubmitRejected::RequestInFlight(pending.id)
        );
        assert_eq!(controller.draft(), "two");
        assert_eq!(controller.transcript().len(), 1);
    }

    #[test]
    fn test_set_draft_keeps_last_value() {
        let mut controller = ConversationSessionController::new(ScriptedClient::answering(0));
        controller.set_draft("same");
        controller.set_draft("same");
        controller.set_draft("same");
        assert_eq!(controller.draft(), "same");
        assert_eq!(controller.snapshot().draft, "same");
    }

    #[tokio::test]
    async fn test_new_session_discards_stale_reply() {
        let client = ScriptedClient::with_replies(vec![Ok("late reply".to_string())]);
        let mut controller = ConversationSessionController::new(client);

        controller.set_draft("old question");
        let pending = controller.begin_submit().unwrap();
        let in_flight = controller.dispatch(pending);

        controller.start_new_session();
        assert!(controller.transcript().is_empty());
        assert_eq!(controller.state(), SessionState::Idle);

        let resolution = controller.resolve(in_flight.await);

        assert_eq!(resolution, Resolution::Stale);
        assert!(controller.transcript().is_empty());
        assert!(controller.ledger().is_empty());
        assert!(controller.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_new_session_discards_stale_failure() {
        let client = ScriptedClient::with_replies(vec![Err(TransportError::Status(500))]);
        let mut controller = ConversationSessionController::new(client);

        controller.set_draft("old question");
        let pending = controller.begin_submit().unwrap();
        let completion = controller.dispatch(pending).await;
        controller.start_new_session();

        assert_eq!(controller.resolve(completion), Resolution::Stale);
        assert!(controller.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_stale_reply_does_not_hijack_new_request() {
        let client = ScriptedClient::with_replies(vec![
            Ok("old reply".to_string()),
            Ok("new reply".to_string()),
        ]);
        let mut controller = ConversationSessionController::new(client);

        controller.set_draft("old");
        let old_pending = controller.begin_submit().unwrap();
        let old = controller.dispatch(old_pending);
        controller.start_new_session();

        controller.set_draft("new");
        let new_pending = controller.begin_submit().unwrap();
        let new_id = new_pending.id;

        let old_completion = old.await;
        assert_eq!(controller.resolve(old_completion), Resolution::Stale);
        assert_eq!(controller.state(), SessionState::Awaiting { request: new_id });

        let new_completion = controller.dispatch(new_pending).await;
        assert!(matches!(
            controller.resolve(new_completion),
            Resolution::Answered { .. }
        ));
        assert_eq!(
            contents(&controller),
            vec![
                (Origin::User, "new".to_string()),
                (Origin::Assistant, "new reply".to_string()),
            ]
        );
        assert_eq!(controller.ledger().list()[0].title, "new");
    }

    #[tokio::test]
    async fn test_ledger_survives_new_session() {
        let mut controller = ConversationSessionController::new(ScriptedClient::answering(1));
        controller.set_draft("remember me");
        controller.submit().await.unwrap();

        controller.start_new_session();

        assert!(controller.transcript().is_empty());
        assert_eq!(controller.ledger().len(), 1);
        assert_eq!(controller.session_epoch(), 1);
    }

    #[tokio::test]
    async fn test_session_epoch_counts_resets_only() {
        let mut controller = ConversationSessionController::new(ScriptedClient::answering(2));
        controller.start_new_session();
        controller.start_new_session();
        assert_eq!(controller.session_epoch(), 2);

        controller.set_draft("first");
        let pending = controller.begin_submit().unwrap();
        let completion = controller.dispatch(pending).await;

        // Same epoch, matching request: applied
        assert!(matches!(
            controller.resolve(completion.clone()),
            Resolution::Answered { .. }
        ));
        // Same epoch, request already settled: stale by id alone
        assert_eq!(controller.resolve(completion), Resolution::Stale);
        assert_eq!(controller.session_epoch(), 2);
    }

    #[tokio::test]
    async fn test_custom_limits() {
        let limits = SessionLimits {
            title_max_chars: 5,
            preview_max_chars: 3,
            ledger_capacity: 2,
        };
        let mut controller =
            ConversationSessionController::with_limits(ScriptedClient::answering(3), limits);

        for q in ["alpha query", "beta query", "gamma query"] {
            controller.set_draft(q);
            controller.submit().await.unwrap();
        }

        let recent = controller.snapshot().recent_sessions;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "gamma...");
        assert_eq!(recent[0].preview, "rep...");
    }

    #[tokio::test]
    async fn test_title_truncation_thresholds() {
        let long_query = "x".repeat(40);
        let short_query = "y".repeat(20);
        let mut controller = ConversationSessionController::new(ScriptedClient::answering(2));

        controller.set_draft(long_query.clone());
        controller.submit().await.unwrap();
        controller.set_draft(short_query.clone());
        controller.submit().await.unwrap();

        let recent = controller.ledger().list();
        assert_eq!(recent[0].title, short_query);
        assert_eq!(recent[1].title, format!("{}...", &long_query[..30]));
    }

    #[tokio::test]
    async fn test_dyn_client_default_type() {
        let client: Arc<dyn QueryClient> = ScriptedClient::answering(1);
        let mut controller: ConversationSessionController =
            ConversationSessionController::new(client);

        controller.set_draft("hi");
        let pending = controller.begin_submit().unwrap();
        let completion = controller.dispatch(pending).await;

        assert!(matches!(
            controller.resolve(completion),
            Resolution::Answered { .. }
        ));
    }
}
