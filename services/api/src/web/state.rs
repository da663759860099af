//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;
use std::time::Instant;

use logos_core::ports::{SermonGenerator, SermonRepository};

use crate::config::Config;

/// The shared application state, created once at startup and passed to all
/// handlers. Handlers hold no mutable state of their own; everything that
/// must survive a request lives behind the repository port.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn SermonRepository>,
    pub generator: Arc<dyn SermonGenerator>,
    pub config: Arc<Config>,
    pub started_at: Instant,
}
