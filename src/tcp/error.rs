use etherparse::TcpOptionReadError;
use thiserror::Error;

use super::SeqNum;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed TCP option: {0}")]
    MalformedOption(#[from] TcpOptionReadError),
    #[error("no segment starting at seq={0} in the send queue")]
    UnknownSegment(SeqNum),
    #[error("ack={ack} acknowledges data not yet sent (snd_nxt={snd_nxt})")]
    AckOutOfWindow { ack: SeqNum, snd_nxt: SeqNum },
}
