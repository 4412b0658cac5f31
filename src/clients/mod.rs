/// Typed records returned by the API
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Authenticated transport to a MyRadio server
pub mod session;
/// Track and album accessors
pub mod tracks;
/// User accessors
pub mod users;

pub use entities::{Album, Officership, Photo, ShowMeta, Track};
pub use errors::{Error, Result};
pub use session::Session;
