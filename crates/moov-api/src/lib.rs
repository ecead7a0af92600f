pub mod auth;
pub mod catalog;
pub mod error;
pub mod events;
pub mod messages;
pub mod notice;
pub mod page;
pub mod router;
pub mod session;
pub mod state;
pub mod venues;
pub mod views;

pub use error::AppError;
pub use router::router;
pub use state::{AppState, AppStateInner};
