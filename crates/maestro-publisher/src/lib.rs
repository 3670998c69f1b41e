//! # maestro-publisher
//!
//! Publication dispatch for Maestro campaigns.
//!
//! Each requested channel ends in exactly one status string: not supported,
//! simulated (no credentials), published, or an inline `ERROR` status when
//! the provider call fails. Provider failures never escape the dispatcher.

mod dispatcher;
mod publisher;
pub mod routing;

pub use dispatcher::{ChannelDispatcher, NO_DRAFT_REASON};
pub use publisher::{default_endpoint, HttpPublisher, Publisher};
pub use routing::{route, Route, ERROR_MARKER, PREVIEW_CHARS, SIMULATED_MARKER, UNSUPPORTED_SUFFIX};
