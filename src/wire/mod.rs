//! Wire protocol of the two debug channels.
//!
//! Four message families share one envelope convention and one framing,
//! see [`codec`]. Requests pair with responses on the request channel,
//! events pair with acks on the event channel.

pub mod codec;
mod event;
mod request;
mod response;

pub use codec::Connection;
pub use event::{Ack, Event};
pub use request::Request;
pub use response::Response;
