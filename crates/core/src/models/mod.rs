//! Resource representations served by the upstream assignment API.
//!
//! These structs deserialize the API's responses verbatim. The portal never
//! recomputes derived fields; after any fulfilled operation, slice state
//! holds exactly what the server returned.

pub mod assignment;
pub mod comment;
pub mod subject;
pub mod user;

pub use assignment::Assignment;
pub use comment::Comment;
pub use subject::Subject;
pub use user::UserSummary;
