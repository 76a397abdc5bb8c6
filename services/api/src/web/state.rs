//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::actions::Actions;
use crate::config::Config;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
/// Holds no mutable data: every action is independent of every other.
#[derive(Clone)]
pub struct AppState {
    pub actions: Actions,
    pub config: Arc<Config>,
}
