//! Watchdog: enumerated periods, kick, and timeout polling.
//!
//! The 626 watchdog API is fully expressible on the 826; the only
//! translation is the period enumeration (see [`crate::timing`]) and the
//! timeout query, which the 826 models as a blocking event wait that this
//! adapter polls with a zero timeout.

use crate::error::Result;
use crate::hal::{S826Driver, Timeout, WatchdogConfig};
use crate::session::Session;
use crate::timing::WatchdogPeriod;

/// Protection key the driver requires on every kick.
const KICK_KEY: u32 = 0x5A55_AA5A;

impl<D: S826Driver> Session<D> {
    /// Program the watchdog interval from a legacy period.
    ///
    /// Replaces `S626_WatchdogPeriodSet()`. The output pulse train is
    /// enabled for 626-compatible timeout behavior.
    pub fn watchdog_period_set(&self, board: u8, period: WatchdogPeriod) -> Result<()> {
        self.check_board(board)?;
        self.driver.watchdog_config_write(
            board,
            WatchdogConfig::PULSE_ENABLE,
            period.to_timers(),
        )?;
        Ok(())
    }

    /// Read the programmed interval back as a legacy period.
    ///
    /// Replaces `S626_WatchdogPeriodGet()`. Only the 125 ms, 500 ms and
    /// 1 s codes can be recovered; a 10 s interval (or anything programmed
    /// outside this layer) fails with
    /// [`UnknownPeriod`](crate::CompatError::UnknownPeriod).
    pub fn watchdog_period_get(&self, board: u8) -> Result<WatchdogPeriod> {
        self.check_board(board)?;
        let (_config, timers) = self.driver.watchdog_config_read(board)?;
        WatchdogPeriod::from_timers(&timers)
    }

    /// Enable or disable the watchdog. Replaces `S626_WatchdogEnableSet()`.
    pub fn watchdog_enable_set(&self, board: u8, enable: bool) -> Result<()> {
        self.check_board(board)?;
        Ok(self.driver.watchdog_enable_write(board, enable)?)
    }

    /// Read the watchdog enable state. Replaces `S626_WatchdogEnableGet()`.
    pub fn watchdog_enable_get(&self, board: u8) -> Result<bool> {
        self.check_board(board)?;
        Ok(self.driver.watchdog_enable_read(board)?)
    }

    /// Restart the watchdog interval. Replaces `S626_WatchdogReset()`.
    pub fn watchdog_reset(&self, board: u8) -> Result<()> {
        self.check_board(board)?;
        Ok(self.driver.watchdog_kick(board, KICK_KEY)?)
    }

    /// Poll whether the watchdog has timed out.
    ///
    /// Replaces `S626_WatchdogTimeout()`. Issues a zero-timeout event wait:
    /// `Ok(true)` means a timeout event was pending, `Ok(false)` means the
    /// interval has not elapsed. An externally cancelled wait propagates as
    /// [`Cancelled`](crate::CompatError::Cancelled), distinct from both
    /// outcomes; any other driver failure propagates verbatim.
    pub fn watchdog_timeout(&self, board: u8) -> Result<bool> {
        self.check_board(board)?;
        match self.driver.watchdog_event_wait(board, Timeout::Poll) {
            Ok(()) => Ok(true),
            Err(crate::hal::HalError::NotReady) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
