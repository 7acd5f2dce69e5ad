mod system;

#[cfg(test)]
pub(crate) use self::mock::MockClock;

pub use self::system::SystemClock;

/// Source of the monotonic time used to stamp transmissions and take RTT
/// samples.
pub trait Clock: Send + Sync {
    /// Returns the current instant
    fn now(&self) -> std::time::Instant;
}
