//! Time-related structures for SCTE-35 messages.
//!
//! PTS values count ticks of the program's 90 kHz clock.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ticks per second of the MPEG-2 system clock used for PTS values.
pub const TICKS_PER_SECOND: u64 = 90_000;

/// Converts 90 kHz ticks to a [`Duration`].
pub fn ticks_to_duration(ticks: u64) -> Duration {
    let secs = ticks / TICKS_PER_SECOND;
    let remainder = ticks % TICKS_PER_SECOND;
    Duration::new(secs, (remainder * 1_000_000_000 / TICKS_PER_SECOND) as u32)
}

/// A `splice_time()` structure.
///
/// When the time is specified the structure is 40 bits wide on the wire
/// (flag, 6 reserved bits, 33-bit PTS); otherwise it is a single byte
/// (flag and 7 reserved bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpliceTime {
    /// Presentation timestamp in 90 kHz ticks, present when `time_specified_flag` is set.
    pub pts_time: Option<u64>,
}

impl SpliceTime {
    /// A splice time carrying `ticks`.
    pub fn from_ticks(ticks: u64) -> Self {
        SpliceTime {
            pts_time: Some(ticks),
        }
    }

    /// Mirrors the `time_specified_flag` bit.
    pub fn time_specified_flag(&self) -> bool {
        self.pts_time.is_some()
    }

    /// Converts the PTS to a [`Duration`], if one is present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use scte35_decoder::SpliceTime;
    /// use std::time::Duration;
    ///
    /// let time = SpliceTime::from_ticks(90_000);
    /// assert_eq!(time.to_duration(), Some(Duration::from_secs(1)));
    /// assert_eq!(SpliceTime::default().to_duration(), None);
    /// ```
    pub fn to_duration(&self) -> Option<Duration> {
        self.pts_time.map(ticks_to_duration)
    }
}

/// A 40-bit `break_duration()` structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreakDuration {
    /// When set, the splicer returns to the network at the end of the break.
    pub auto_return: bool,
    /// Length of the break in 90 kHz ticks (33 bits).
    pub duration: u64,
}

impl BreakDuration {
    /// Converts the duration to a [`Duration`].
    pub fn to_duration(&self) -> Duration {
        ticks_to_duration(self.duration)
    }
}
