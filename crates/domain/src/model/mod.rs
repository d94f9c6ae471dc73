//! Platform objects exchanged over the REST surface.
//!
//! Field names match the wire format (`snake_case`), so no renames are
//! needed.  Optional fields are omitted when serialising.

mod attachment;
mod embed;
mod intents;
mod message;
mod user;

pub use attachment::*;
pub use embed::*;
pub use intents::*;
pub use message::*;
pub use user::*;
