//! Segment records kept by the send queue
use std::time::Instant;

use super::SeqNum;

/// A transmitted segment awaiting acknowledgment.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Starting sequence number
    pub seq: SeqNum,
    /// Payload length in bytes
    pub len: u32,
    /// When this segment was last (re)transmitted
    pub xmit_time: Instant,
    /// Number of transmissions so far; 1 means never retransmitted
    pub xmit_count: u32,
    /// Already reported to RACK through a SACK block
    pub sacked: bool,
}

impl Segment {
    /// Create a record for a segment sent for the first time
    pub fn new(seq: SeqNum, len: u32, xmit_time: Instant) -> Self {
        Segment {
            seq,
            len,
            xmit_time,
            xmit_count: 1,
            sacked: false,
        }
    }

    /// Sequence number one past the last payload byte.
    pub fn end_seq(&self) -> SeqNum {
        self.seq.add(self.len)
    }

    pub fn is_retransmitted(&self) -> bool {
        self.xmit_count > 1
    }

    /// Record a retransmission at `now`.
    pub fn retransmitted_at(&mut self, now: Instant) {
        self.xmit_time = now;
        self.xmit_count += 1;
    }
}
