//! The parts of an incoming ACK's TCP options that loss detection needs.
use etherparse::{TcpHeaderSlice, TcpOptionElement};

use super::{Error, SeqNum};

/// A SACK block: the peer holds `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SackBlock {
    pub start: SeqNum,
    pub end: SeqNum,
}

impl SackBlock {
    pub fn new(start: SeqNum, end: SeqNum) -> Self {
        SackBlock { start, end }
    }

    /// `[start, end)` lies entirely inside this block.
    pub fn contains(&self, start: SeqNum, end: SeqNum) -> bool {
        self.start.less_than_eq(start) && end.less_than_eq(self.end)
    }

    pub fn contains_block(&self, other: &SackBlock) -> bool {
        self.contains(other.start, other.end)
    }
}

impl From<(u32, u32)> for SackBlock {
    fn from((start, end): (u32, u32)) -> Self {
        SackBlock::new(start.into(), end.into())
    }
}

/// Timestamp option (RFC 7323) carried by a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub val: u32,
    pub ecr: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AckOptions {
    pub timestamp: Option<Timestamp>,
    /// SACK blocks in the order the peer listed them.
    pub sack_blocks: Vec<SackBlock>,
}

impl AckOptions {
    /// Extract the timestamp and SACK options from a TCP header.
    pub fn parse(tcp_hdr: &TcpHeaderSlice) -> Result<Self, Error> {
        let mut options = AckOptions::default();
        for element in tcp_hdr.options_iterator() {
            match element? {
                TcpOptionElement::Timestamp(val, ecr) => {
                    options.timestamp = Some(Timestamp { val, ecr });
                }
                TcpOptionElement::SelectiveAcknowledgement(first, rest) => {
                    options.sack_blocks.push(first.into());
                    options
                        .sack_blocks
                        .extend(rest.iter().flatten().map(|&block| SackBlock::from(block)));
                }
                _ => {}
            }
        }
        Ok(options)
    }

    /// The echoed TSval, if the peer sent a usable one.
    ///
    /// An echo of zero is treated as absent: the peer has nothing to echo
    /// until it has seen one of our timestamps.
    pub fn echo_reply(&self) -> Option<u32> {
        self.timestamp.map(|ts| ts.ecr).filter(|&ecr| ecr != 0)
    }

    /// Returns true if the first SACK block reports duplicate data (RFC 2883
    /// section 4): either it is covered by the cumulative ACK, or it lies
    /// within the second block.
    pub fn is_dsack(&self, cum_ack: SeqNum) -> bool {
        let Some(first) = self.sack_blocks.first() else {
            return false;
        };
        if first.start.less_than(cum_ack) {
            return true;
        }
        self.sack_blocks
            .get(1)
            .is_some_and(|second| second.contains_block(first))
    }

    /// SACK blocks that report newly received data, i.e. without a leading
    /// DSACK block.
    pub fn new_sack_blocks(&self, cum_ack: SeqNum) -> &[SackBlock] {
        if self.is_dsack(cum_ack) {
            &self.sack_blocks[1..]
        } else {
            &self.sack_blocks
        }
    }
}
