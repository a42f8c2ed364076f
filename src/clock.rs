use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};

/// Instant stamped into audit fields.
pub type Timestamp = DateTime<Utc>;

/// Source of the instant captured during a dispatch.
///
/// The dispatcher reads its clock exactly once per dispatch, so the creation
/// and modification times stamped by a single CREATE are the same instant,
/// not two nearby ones.
///
/// Implementations must be cheap and non-blocking; a dispatch never suspends.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system's UTC time.
///
/// This is the clock production dispatchers run with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

// A borrowed clock is a clock, so callers can keep ownership (and control)
// of a test clock while a dispatcher reads it.
impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// A clock pinned to an explicit instant.
///
/// **WARNING:** This clock never ticks on its own and should only be used in
/// tests and demos, where a deterministic "now" makes stamped fields exactly
/// assertable. Move it forward with [`set`](Self::set) or
/// [`advance`](Self::advance).
///
/// # Examples
///
/// ```
/// use audit_stamp::{Clock, FixedClock};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
/// let t0 = clock.now();
///
/// clock.advance(Duration::minutes(3));
/// assert_eq!(clock.now() - t0, Duration::minutes(3));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<Timestamp>,
}

impl FixedClock {
    /// Creates a clock pinned at the given instant.
    pub fn new(at: Timestamp) -> Self {
        Self { now: Cell::new(at) }
    }

    /// Moves the clock to the given instant.
    pub fn set(&self, at: Timestamp) {
        self.now.set(at);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
