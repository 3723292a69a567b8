//! AI coaching
//!
//! The gateway in front of the AI provider, the fallback answers it uses
//! when the provider is unavailable, and the history filter applied before
//! each provider call.

pub mod fallback;
pub mod gateway;
pub mod history;

pub use fallback::{fallback_response, FallbackTopic};
pub use gateway::{CoachingGateway, CoachingReply};
pub use history::filter_history;
