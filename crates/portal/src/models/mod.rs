//! Portal-local models.

pub mod session;

pub use session::{CurrentUser, keys};
