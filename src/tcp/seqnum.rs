//! TCP sequence number arithmetic
use std::fmt;

/// A position in the 32-bit TCP sequence space.
///
/// Sequence numbers wrap around to 0 after reaching 2^32 - 1, so ordering is
/// only meaningful between values less than 2^31 apart. `SeqNum` deliberately
/// does not implement `PartialOrd`: every comparison goes through
/// [`SeqNum::less_than`] and friends, which follow RFC 1323's rule that
/// `a < b` iff `b - a` is positive in 32-bit signed arithmetic.
///
/// # Examples
///
/// ```
/// use rackwire::tcp::SeqNum;
/// // Normal case: 100 < 200
/// assert!(SeqNum::new(100).less_than(SeqNum::new(200)));
///
/// // Wraparound case: 4_294_967_290 < 10
/// assert!(SeqNum::new(4_294_967_290).less_than(SeqNum::new(10)));
///
/// // 10 bytes past the end of the space lands on 4
/// assert_eq!(SeqNum::new(u32::MAX - 5).add(10), SeqNum::new(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SeqNum(u32);

impl SeqNum {
    pub const fn new(value: u32) -> Self {
        SeqNum(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the sequence number `len` bytes after `self`.
    #[must_use]
    pub fn add(self, len: u32) -> Self {
        SeqNum(self.0.wrapping_add(len))
    }

    pub fn less_than(self, other: SeqNum) -> bool {
        (other.0.wrapping_sub(self.0) as i32) > 0
    }

    pub fn less_than_eq(self, other: SeqNum) -> bool {
        self == other || self.less_than(other)
    }
}

impl From<u32> for SeqNum {
    fn from(value: u32) -> Self {
        SeqNum(value)
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
