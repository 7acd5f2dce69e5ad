//! RACK loss-detection state, per
//! [draft-ietf-tcpm-rack-08](https://tools.ietf.org/html/draft-ietf-tcpm-rack-08).
//!
//! RACK infers loss and reordering from the transmission time of
//! acknowledged segments instead of duplicate ACK counts. This module only
//! keeps the observations; deciding which segments are lost is left to the
//! owner of the send queue. RACK needs SACK, so the owner must only create a
//! [`RackState`] on connections that negotiated it.
use std::time::{Duration, Instant};

use super::{timestamp, Segment, SeqNum, TimestampClock};

/// Per-connection RACK observations (draft section 6.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackState {
    dsack_seen: bool,
    /// Highest sequence selectively or cumulatively acknowledged.
    fack: SeqNum,
    /// Global minimum of accepted RTT samples.
    min_rtt: Option<Duration>,
    /// Most recent accepted RTT sample.
    rtt: Option<Duration>,
    reorder_seen: bool,
    /// Transmit time and end sequence of the most recently sent segment
    /// among those delivered.
    xmit: Option<(Instant, SeqNum)>,
}

impl RackState {
    /// Starts tracking with nothing acknowledged beyond `snd_una`.
    pub fn new(snd_una: SeqNum) -> Self {
        RackState {
            dsack_seen: false,
            fack: snd_una,
            min_rtt: None,
            rtt: None,
            reorder_seen: false,
            xmit: None,
        }
    }

    /// Feeds a newly acknowledged segment into the RTT and transmit-time
    /// state (draft section 7.2, step 2).
    ///
    /// `tsecr` is the timestamp echo of the acknowledging packet, if it carried
    /// a non-zero one. Returns whether the sample was accepted; a rejected
    /// sample leaves the state untouched.
    pub fn update(
        &mut self,
        seg: &Segment,
        tsecr: Option<u32>,
        ts_clock: &TimestampClock,
        now: Instant,
    ) -> bool {
        // A transmit time in the future yields no sample at all.
        let Some(rtt) = now.checked_duration_since(seg.xmit_time) else {
            return false;
        };

        // For a retransmitted segment the ACK may belong to an earlier
        // transmission. Reject the sample if the peer echoed a TSval older
        // than the latest transmission, or if the RTT is below anything we
        // have seen on this connection.
        if seg.is_retransmitted() {
            if let Some(ecr) = tsecr {
                if timestamp::ts_before(ecr, ts_clock.value(seg.xmit_time)) {
                    return false;
                }
            }
            if self.min_rtt.is_some_and(|min| rtt < min) {
                return false;
            }
        }

        self.rtt = Some(rtt);
        // A simple global minimum rather than a windowed min filter.
        if self.min_rtt.map_or(true, |min| rtt < min) {
            self.min_rtt = Some(rtt);
        }

        let end_seq = seg.end_seq();
        let newer = match self.xmit {
            None => true,
            Some((xmit_time, end_sequence)) => {
                xmit_time < seg.xmit_time
                    || (xmit_time == seg.xmit_time && end_sequence.less_than(end_seq))
            }
        };
        if newer {
            self.xmit = Some((seg.xmit_time, end_seq));
        }
        true
    }

    /// Detects reordering from a newly acknowledged segment (draft section
    /// 7.2, step 3).
    ///
    /// An original transmission delivered below `fack` arrived out of order.
    /// Retransmitted segments are ambiguous and never set the flag. Returns
    /// true if this call is the one that first observed reordering.
    pub fn detect_reorder(&mut self, seg: &Segment) -> bool {
        let end_seq = seg.end_seq();
        if self.fack.less_than(end_seq) {
            self.fack = end_seq;
            return false;
        }

        if end_seq.less_than(self.fack) && seg.xmit_count == 1 && !self.reorder_seen {
            self.reorder_seen = true;
            return true;
        }
        false
    }

    pub fn mark_dsack_seen(&mut self) {
        self.dsack_seen = true;
    }

    pub fn dsack_seen(&self) -> bool {
        self.dsack_seen
    }

    pub fn fack(&self) -> SeqNum {
        self.fack
    }

    /// `None` until the first sample is accepted.
    pub fn min_rtt(&self) -> Option<Duration> {
        self.min_rtt
    }

    pub fn rtt(&self) -> Option<Duration> {
        self.rtt
    }

    pub fn reorder_seen(&self) -> bool {
        self.reorder_seen
    }

    pub fn xmit_time(&self) -> Option<Instant> {
        self.xmit.map(|(time, _)| time)
    }

    pub fn end_sequence(&self) -> Option<SeqNum> {
        self.xmit.map(|(_, seq)| seq)
    }
}
