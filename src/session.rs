//! Session and per-board capability state.
//!
//! The original migration aid kept the detected-board mask and the active
//! ADC slot lists in process-wide statics. Here that state lives in an
//! explicit [`Session`] owned by the caller: open it once, pass it to every
//! adapter, and the driver session is released when it is closed or
//! dropped. One session covers all boards in the system, matching the
//! all-at-once open semantics of the 826 driver.

use tracing::{debug, warn};

use crate::error::{CompatError, Result};
use crate::hal::{S826Driver, VersionInfo, MAX_BOARDS};
use crate::report::{LogReporter, Reporter};

/// Signature of a legacy 626 interrupt callback.
///
/// Exists only so ported call sites keep compiling; any non-`None` callback
/// passed to [`Session::open_board`] is rejected, because the 826 model
/// replaces interrupt callbacks with blocking calls.
pub type InterruptCallback = fn(board: u8);

/// An open driver session plus the per-board state later adapters need.
///
/// Adapters are stateless functions over this session and their arguments;
/// the session itself holds only the detection mask from open time and one
/// ADC slot mask per board. Per-board state is not internally locked:
/// reprogramming and reading the same board from multiple threads must be
/// serialized by the caller.
pub struct Session<D: S826Driver> {
    pub(crate) driver: D,
    /// One bit per board handle, set if the board answered at open.
    pub(crate) detected: u16,
    /// Active ADC time slots per board, rewritten wholesale on reprogram.
    pub(crate) adc_slots: [u16; MAX_BOARDS],
    pub(crate) reporter: Box<dyn Reporter>,
    closed: bool,
}

impl<D: S826Driver> Session<D> {
    /// Open the driver session and record which boards were detected.
    ///
    /// Replaces `S626_DLLOpen()`. Detection failure from the driver is
    /// propagated unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use s626_compat::{hal::mock::MockBoard, Session};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let session = Session::open(MockBoard::new())?;
    /// assert_eq!(session.detected_boards(), 0b1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(driver: D) -> Result<Self> {
        Self::open_with_reporter(driver, Box::new(LogReporter))
    }

    /// Open a session with a custom diagnostic sink.
    pub fn open_with_reporter(driver: D, reporter: Box<dyn Reporter>) -> Result<Self> {
        let detected = driver.system_open()?;
        debug!(detected = format_args!("{detected:#06x}"), "Opened 826 driver session");
        Ok(Self {
            driver,
            detected,
            adc_slots: [0; MAX_BOARDS],
            reporter,
            closed: false,
        })
    }

    /// Close the session and release the driver.
    ///
    /// Replaces `S626_DLLClose()`. Dropping the session has the same
    /// effect; this form exists for call sites that closed explicitly.
    pub fn close(mut self) {
        self.teardown();
    }

    /// Validate that one board is ready for use.
    ///
    /// Replaces `S626_OpenBoard()`. On the 826 every detected board is
    /// already open, so this only checks the detection bit. A legacy
    /// interrupt callback is rejected outright: the 826 driver has no
    /// callback concept, and waiting code should call the matching blocking
    /// adapter instead.
    pub fn open_board(&self, board: u8, callback: Option<InterruptCallback>) -> Result<()> {
        if callback.is_some() {
            self.notify(
                "S626_OpenBoard(): interrupt callbacks are deprecated; \
                 the 826 API uses blocking calls for interrupt processing",
            );
            return Err(CompatError::CallbacksUnsupported);
        }
        self.check_board(board)
    }

    /// No-op, kept for source compatibility with `S626_CloseBoard()`.
    ///
    /// Boards close all at once when the session does.
    pub fn close_board(&self, _board: u8) {}

    /// The bus address of a board. Replaces `S626_GetAddress()`: on the 826
    /// the handle and the address switch setting are the same number.
    pub fn board_address(&self, board: u8) -> u8 {
        board
    }

    /// Read all version numbers from one board.
    pub fn versions(&self, board: u8) -> Result<VersionInfo> {
        self.check_board(board)?;
        Ok(self.driver.version_read(board)?)
    }

    /// API library version, or 0 if the query fails.
    ///
    /// Replaces `S626_GetDllVersion()`, legacy return shape included.
    pub fn api_version(&self, board: u8) -> u32 {
        self.versions(board).map(|v| v.api).unwrap_or(0)
    }

    /// Kernel driver version, or 0 if the query fails.
    ///
    /// Replaces `S626_GetDriverVersion()`, legacy return shape included.
    pub fn driver_version(&self, board: u8) -> u32 {
        self.versions(board).map(|v| v.driver).unwrap_or(0)
    }

    /// Bitmask of boards detected at open, indexed by board handle.
    pub fn detected_boards(&self) -> u16 {
        self.detected
    }

    /// The ADC time slots currently programmed for one board.
    pub fn programmed_slots(&self, board: u8) -> Result<u16> {
        self.check_board(board)?;
        Ok(self.adc_slots[usize::from(board)])
    }

    /// Borrow the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutably borrow the underlying driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Reject out-of-range handles and boards that were not detected.
    pub(crate) fn check_board(&self, board: u8) -> Result<()> {
        if usize::from(board) >= MAX_BOARDS {
            return Err(CompatError::InvalidBoard { board });
        }
        if self.detected & (1 << board) == 0 {
            return Err(CompatError::BoardNotDetected { board });
        }
        Ok(())
    }

    pub(crate) fn notify(&self, message: &str) {
        self.reporter.notify(message);
    }

    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.detected = 0;
        self.adc_slots = [0; MAX_BOARDS];
        self.driver.system_close();
        debug!("Closed 826 driver session");
    }
}

impl<D: S826Driver> Drop for Session<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<D: S826Driver> std::fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("detected", &format_args!("{:#06x}", self.detected))
            .field("adc_slots", &self.adc_slots)
            .finish()
    }
}

/// Emit the diagnostic for a supported-but-divergent operation and log a
/// failed best-effort call without surfacing it; used by adapters whose
/// legacy shape has no status return.
pub(crate) fn log_best_effort(result: crate::hal::HalResult<()>, operation: &str) {
    if let Err(err) = result {
        warn!(
            target: "s626_compat",
            operation,
            code = err.code(),
            "best-effort translation call failed"
        );
    }
}
