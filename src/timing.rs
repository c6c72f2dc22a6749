//! Translation between legacy watchdog period codes and 826 timer values.
//!
//! The 626 watchdog is programmed with one of four enumerated periods; the
//! 826 takes five numeric timer registers in watchdog clock ticks. The
//! forward translation goes enum → milliseconds → ticks through two fixed
//! scalars. The reverse translation divides the primary interval back down
//! and matches it against the legacy set -- and is deliberately lossy: the
//! 10 s code is not recognized on the way back (see
//! [`WatchdogPeriod::from_timers`]).

use crate::error::{CompatError, Result};
use crate::hal::WatchdogTimers;

/// Watchdog clock ticks per millisecond of timeout interval.
pub const WD_INTERVAL_SCALAR: u32 = 50_000;

/// Watchdog clock ticks per millisecond of output toggle width.
pub const WD_TOGGLE_SCALAR: u32 = 25_000;

/// The closed set of legacy watchdog periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogPeriod {
    /// 125 ms (legacy code 0).
    Ms125,
    /// 500 ms (legacy code 1).
    Ms500,
    /// 1 s (legacy code 2).
    S1,
    /// 10 s (legacy code 3).
    S10,
}

impl WatchdogPeriod {
    /// The legacy enumeration value for this period.
    pub fn legacy_code(self) -> u16 {
        match self {
            Self::Ms125 => 0,
            Self::Ms500 => 1,
            Self::S1 => 2,
            Self::S10 => 3,
        }
    }

    /// Period length in milliseconds.
    pub fn ms(self) -> u32 {
        match self {
            Self::Ms125 => 125,
            Self::Ms500 => 500,
            Self::S1 => 1000,
            Self::S10 => 10_000,
        }
    }

    /// Expand this period into the five 826 timer registers.
    ///
    /// The primary interval is scaled by [`WD_INTERVAL_SCALAR`], the two
    /// output toggle fields by [`WD_TOGGLE_SCALAR`]; the auxiliary delays
    /// are fixed at one tick each.
    pub fn to_timers(self) -> WatchdogTimers {
        let ms = self.ms();
        WatchdogTimers {
            delay0: ms * WD_INTERVAL_SCALAR,
            delay1: 1,
            delay2: 1,
            pulse_width: ms * WD_TOGGLE_SCALAR,
            pulse_gap: ms * WD_TOGGLE_SCALAR,
        }
    }

    /// Recover a legacy period from programmed 826 timers.
    ///
    /// Divides the primary interval by [`WD_INTERVAL_SCALAR`] and matches
    /// the quotient against 125, 500 and 1000 ms. The 10 s code is not in
    /// the match set, so a watchdog programmed through
    /// [`WatchdogPeriod::S10`] reads back as [`CompatError::UnknownPeriod`].
    /// This asymmetry is inherited from the original migration aid and is
    /// preserved rather than papered over with invented rounding.
    pub fn from_timers(timers: &WatchdogTimers) -> Result<Self> {
        match timers.delay0 / WD_INTERVAL_SCALAR {
            125 => Ok(Self::Ms125),
            500 => Ok(Self::Ms500),
            1000 => Ok(Self::S1),
            ms => Err(CompatError::UnknownPeriod { ms }),
        }
    }
}

impl TryFrom<u16> for WatchdogPeriod {
    type Error = CompatError;

    fn try_from(code: u16) -> Result<Self> {
        match code {
            0 => Ok(Self::Ms125),
            1 => Ok(Self::Ms500),
            2 => Ok(Self::S1),
            3 => Ok(Self::S10),
            _ => Err(CompatError::InvalidPeriod { code }),
        }
    }
}
