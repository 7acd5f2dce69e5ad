//! TCP timestamp option values (RFC 7323).
use std::time::Instant;

/// Maps local instants onto the 32-bit TSval space sent to the peer.
///
/// The clock ticks once per millisecond from `origin`. `offset` is chosen once
/// per connection so that TSvals do not leak the host's uptime; the peer
/// echoes these values back verbatim, which lets the sender tell which
/// transmission of a segment an ACK belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TimestampClock {
    origin: Instant,
    offset: u32,
}

impl TimestampClock {
    pub fn new(origin: Instant, offset: u32) -> Self {
        TimestampClock { origin, offset }
    }

    /// Same as [`TimestampClock::new`] with a random offset.
    pub fn random(origin: Instant) -> Self {
        Self::new(origin, rand::random())
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// TSval for an event that happened at `time`.
    pub fn value(&self, time: Instant) -> u32 {
        let millis = time
            .checked_duration_since(self.origin)
            .map(|d| d.as_millis() as u32)
            .unwrap_or(0);
        millis.wrapping_add(self.offset)
    }
}

/// Returns true if timestamp `a` is older than `b`, modulo 2^32.
pub fn ts_before(a: u32, b: u32) -> bool {
    (b.wrapping_sub(a) as i32) > 0
}
