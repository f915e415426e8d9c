#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Conversation session control for a single active transcript.
//!
//! The [`ConversationSessionController`] owns the transcript, the draft
//! input and the idle/awaiting state, drives one query at a time through a
//! [`wikibot_core::QueryClient`], and records each completed exchange in a
//! bounded [`RecentSessionsLedger`].
//!
//! # Key Features
//! - Explicit `Idle`/`Awaiting` state tagged with the in-flight request id
//! - Stale replies from a superseded session are discarded
//! - Transient failure notifications drained by the presentation layer

mod controller;
mod ledger;
mod notification;
mod session;

pub use controller::{
    Completion, ConversationSessionController, PendingRequest, RequestId, Resolution,
    SessionSnapshot, SessionState, SubmitRejected,
};
pub use ledger::RecentSessionsLedger;
pub use notification::{Notification, NotificationKind};
pub use session::Transcript;
