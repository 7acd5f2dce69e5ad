//! Sender-side TCP loss-detection signals using RACK (Recent ACKnowledgment).
//!
//! [`tcp::RackState`] holds the per-connection observations and
//! [`tcp::Sender`] feeds it from incoming ACKs.
pub mod clock;
pub mod tcp;


pub use clock::{Clock, SystemClock};
pub use tcp::{RackState, Sender};
