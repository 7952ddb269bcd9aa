//! # Atlas Session
//!
//! The single exploration-session state: the loaded library, the displayed
//! graph, selection, search query and view mode, held in one owned struct.
//! Every user action is a transition that consumes the session and returns
//! the next state, which keeps the expand/collapse machine testable and
//! makes the handling of stale asynchronous completions an explicit policy
//! (a generation token) instead of an implicit race.

mod state;

pub use state::{Generation, Session, ViewMode, DEFAULT_FEATURE_CLASSES};
