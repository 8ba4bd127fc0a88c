//! Web server module
//!
//! Serves the widget embed page, the gallery, and the client tool bridge.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
