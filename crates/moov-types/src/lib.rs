pub mod forms;
pub mod models;
pub mod price;

pub use models::{Claims, UserType};
pub use price::Price;

/// Tickets allocated to every newly hosted event.
pub const INITIAL_TICKET_ALLOCATION: i64 = 100;
