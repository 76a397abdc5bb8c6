pub mod extract;
pub mod middleware;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router constructor so the binary can build the app in one call.
pub use router::create_router;
pub use state::AppState;
