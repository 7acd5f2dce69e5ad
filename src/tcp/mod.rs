mod error;
mod options;
mod rack;
mod segment;
mod sender;
mod seqnum;
mod timestamp;

pub use self::error::Error;
pub use self::options::{AckOptions, SackBlock, Timestamp};
pub use self::rack::RackState;
pub use self::segment::Segment;
pub use self::sender::{AckSummary, Sender, Snapshot};
pub use self::seqnum::SeqNum;
pub use self::timestamp::{ts_before, TimestampClock};
