pub mod comments;
pub mod error;
pub mod identity;
pub mod messages;
pub mod posts;
pub mod routes;
pub mod state;
pub mod stats;
pub mod subreddits;
pub mod users;

pub use routes::create_router;
pub use state::{AppState, AppStateInner};
