use log::{debug, trace, warn};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use etherparse::TcpHeaderSlice;

use crate::clock::Clock;
use crate::tcp::{AckOptions, Error, RackState, SackBlock, Segment, SeqNum, TimestampClock};

/// What a single incoming ACK changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckSummary {
    /// Segments cumulatively or selectively acknowledged for the first time
    pub newly_acked: usize,
    /// Of those, how many produced an RTT sample RACK accepted
    pub samples: usize,
    /// The ACK carried a DSACK
    pub dsack: bool,
    /// This ACK is the first to reveal reordering on the connection
    pub reorder_detected: bool,
}

/// Sender side of a connection: the queue of unacknowledged segments and the
/// RACK observations fed from incoming ACKs.
///
/// Deciding what to retransmit and when is up to the caller; the sender only
/// records the transmissions it is told about.
pub struct Sender {
    pub(crate) id: u64,
    snd_una: SeqNum,
    snd_nxt: SeqNum,
    // Unacknowledged segments in sequence order
    queue: VecDeque<Segment>,
    // Only present when SACK was negotiated
    rack: Option<RackState>,
    ts_clock: TimestampClock,
    // a clock we control
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("id", &self.id)
            .field("snd_una", &self.snd_una)
            .field("snd_nxt", &self.snd_nxt)
            .field("queue.len()", &self.queue.len())
            .field("rack", &self.rack)
            .field("ts_offset", &self.ts_clock.offset())
            .finish()
    }
}

impl Sender {
    /// Create the sender for a connection whose first data byte is `iss`.
    ///
    /// RACK tracking is enabled only if the peer permitted SACK.
    pub fn new(id: u64, clock: Arc<dyn Clock>, iss: SeqNum, sack_permitted: bool) -> Self {
        let ts_clock = TimestampClock::random(clock.now());
        Self::with_timestamp_clock(id, clock, iss, sack_permitted, ts_clock)
    }

    /// Same as [`Sender::new`] with a caller-chosen timestamp clock.
    pub fn with_timestamp_clock(
        id: u64,
        clock: Arc<dyn Clock>,
        iss: SeqNum,
        sack_permitted: bool,
        ts_clock: TimestampClock,
    ) -> Self {
        debug!(
            "[#{}] sender created: iss={} sack_permitted={} ts_offset={}",
            id,
            iss,
            sack_permitted,
            ts_clock.offset()
        );
        Sender {
            id,
            snd_una: iss,
            snd_nxt: iss,
            queue: VecDeque::new(),
            rack: sack_permitted.then(|| RackState::new(iss)),
            ts_clock,
            clock,
        }
    }

    pub fn rack(&self) -> Option<&RackState> {
        self.rack.as_ref()
    }

    pub fn snd_una(&self) -> SeqNum {
        self.snd_una
    }

    pub fn snd_nxt(&self) -> SeqNum {
        self.snd_nxt
    }

    /// Unacknowledged segments, oldest first.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.queue.iter()
    }

    /// TSval to put on a segment sent now.
    pub fn timestamp_value(&self) -> u32 {
        self.ts_clock.value(self.clock.now())
    }

    /// Record `len` new bytes transmitted at `snd_nxt`. Returns the segment's
    /// starting sequence number.
    pub fn send(&mut self, len: u32) -> SeqNum {
        let seq = self.snd_nxt;
        let segment = Segment::new(seq, len, self.clock.now());
        trace!("[#{}] queued seq={} len={}", self.id, seq, len);
        self.queue.push_back(segment);
        self.snd_nxt = seq.add(len);
        seq
    }

    /// Record a retransmission of the segment starting at `seq`.
    pub fn retransmit(&mut self, seq: SeqNum) -> Result<(), Error> {
        let now = self.clock.now();
        let segment = self
            .queue
            .iter_mut()
            .find(|s| s.seq == seq)
            .ok_or(Error::UnknownSegment(seq))?;
        segment.retransmitted_at(now);
        trace!(
            "[#{}] retransmitted seq={} len={} xmit_count={}",
            self.id,
            seq,
            segment.len,
            segment.xmit_count
        );
        Ok(())
    }

    /// Parse the options of an incoming segment and process its ACK.
    /// Segments without the ACK flag change nothing.
    pub fn on_ack_header(&mut self, tcp_hdr: &TcpHeaderSlice) -> Result<AckSummary, Error> {
        if !tcp_hdr.ack() {
            return Ok(AckSummary::default());
        }
        let options = AckOptions::parse(tcp_hdr)?;
        self.on_ack(SeqNum::new(tcp_hdr.acknowledgment_number()), &options)
    }

    /// Process a cumulative ACK and its options.
    ///
    /// Every segment acknowledged for the first time, cumulatively or by a SACK
    /// block, goes through [`RackState::update`] and then
    /// [`RackState::detect_reorder`]. Cumulatively acknowledged segments
    /// leave the queue.
    pub fn on_ack(&mut self, ack: SeqNum, options: &AckOptions) -> Result<AckSummary, Error> {
        if self.snd_nxt.less_than(ack) {
            warn!(
                "[#{}] ignoring ack={} beyond snd_nxt={}",
                self.id, ack, self.snd_nxt
            );
            return Err(Error::AckOutOfWindow {
                ack,
                snd_nxt: self.snd_nxt,
            });
        }

        let now = self.clock.now();
        let tsecr = options.echo_reply();
        let mut summary = AckSummary::default();

        let sack_blocks: &[SackBlock] = match &mut self.rack {
            Some(rack) => {
                if options.is_dsack(ack) {
                    if !rack.dsack_seen() {
                        debug!("[#{}] first DSACK seen, ack={}", self.id, ack);
                    }
                    rack.mark_dsack_seen();
                    summary.dsack = true;
                }
                options.new_sack_blocks(ack)
            }
            None => &[],
        };

        for segment in self.queue.iter_mut() {
            let end_seq = segment.end_seq();
            let cumulative = end_seq.less_than_eq(ack);
            if !cumulative && !sack_blocks.iter().any(|b| b.contains(segment.seq, end_seq)) {
                continue;
            }
            // Already fed to RACK when it was first SACKed.
            if segment.sacked {
                continue;
            }
            if !cumulative {
                segment.sacked = true;
            }
            summary.newly_acked += 1;

            let Some(rack) = &mut self.rack else {
                continue;
            };
            if rack.update(segment, tsecr, &self.ts_clock, now) {
                summary.samples += 1;
                trace!(
                    "[#{}] rtt sample seq={} rtt={:?} min_rtt={:?}",
                    self.id,
                    segment.seq,
                    rack.rtt(),
                    rack.min_rtt()
                );
            } else {
                trace!(
                    "[#{}] discarded rtt sample seq={} xmit_count={} tsecr={:?}",
                    self.id,
                    segment.seq,
                    segment.xmit_count,
                    tsecr
                );
            }
            if rack.detect_reorder(segment) {
                summary.reorder_detected = true;
                debug!(
                    "[#{}] reordering detected: seq={} end={} below fack={}",
                    self.id,
                    segment.seq,
                    end_seq,
                    rack.fack()
                );
            }
        }

        while self
            .queue
            .front()
            .is_some_and(|s| s.end_seq().less_than_eq(ack))
        {
            self.queue.pop_front();
        }
        if self.snd_una.less_than(ack) {
            self.snd_una = ack;
        }

        debug!(
            "[#{}] ack={} newly_acked={} samples={} in_flight={}",
            self.id,
            ack,
            summary.newly_acked,
            summary.samples,
            self.queue.len()
        );
        Ok(summary)
    }
}

/// Sender snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub id: u64,
    pub snd_una: SeqNum,
    pub snd_nxt: SeqNum,
    pub in_flight: usize,
    pub rack_enabled: bool,
    pub min_rtt: Option<Duration>,
    pub rtt: Option<Duration>,
    pub fack: Option<SeqNum>,
    pub reorder_seen: bool,
    pub dsack_seen: bool,
}

impl Sender {
    pub fn peek(&self) -> Snapshot {
        let rack = self.rack.as_ref();
        Snapshot {
            id: self.id,
            snd_una: self.snd_una,
            snd_nxt: self.snd_nxt,
            in_flight: self.queue.len(),
            rack_enabled: rack.is_some(),
            min_rtt: rack.and_then(RackState::min_rtt),
            rtt: rack.and_then(RackState::rtt),
            fack: rack.map(RackState::fack),
            reorder_seen: rack.is_some_and(RackState::reorder_seen),
            dsack_seen: rack.is_some_and(RackState::dsack_seen),
        }
    }
}
