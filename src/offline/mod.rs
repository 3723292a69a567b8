//! Offline-first client workflow
//!
//! - `connectivity`: observable online/offline flag
//! - `client`: the coaching API as seen by the client, plus its HTTP implementation
//! - `engine`: routing of queries to network, cache or pending queue

pub mod client;
pub mod connectivity;
pub mod engine;

pub use client::{AskRequest, AskResponse, CoachApi, HttpCoachApi};
pub use connectivity::{Connectivity, SubscriptionId};
pub use engine::{OfflineEngine, QueryOutcome, ResponseSource, SyncReport};
