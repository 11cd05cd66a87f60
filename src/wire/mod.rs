//! The wire boundary: internal [`event::Event`]s vs the JSON-tagged
//! [`message::ServerMessage`]/[`message::ClientMessage`] enums, bridged by
//! [`protocol::Protocol`]. The engine never serializes directly; only this
//! module knows about serde.
mod event;
mod message;
mod protocol;

pub use event::Event;
pub use message::{ActionPayload, ClientMessage, PlayerView, ServerMessage, ValidActions};
pub use protocol::Protocol;
