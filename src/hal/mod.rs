//! Abstraction over the 826-side device driver.
//!
//! The migration layer never touches hardware itself; every operation is
//! expressed against the [`S826Driver`] trait, which mirrors the blocking
//! entry points of the 826 driver one method per call. The vendor driver is
//! wrapped behind this seam so that ported applications can run their test
//! suites against [`mock::MockBoard`] without a board installed.
//!
//! All methods take `&self`: driver implementations serialize access to the
//! underlying handle internally, so a single driver value can back every
//! board in the system (handles 0-15, matching the address switches).

pub mod mock;

use bitflags::bitflags;

/// Maximum number of boards addressable in one system (set by the four
/// address switches on each board).
pub const MAX_BOARDS: usize = 16;

/// Number of hardware ADC time slots per board.
pub const ADC_SLOTS: usize = 16;

/// Number of general-purpose counter channels per board.
pub const COUNTER_CHANNELS: u8 = 6;

/// Raw status codes reported by the 826 driver.
///
/// Negative values are failures; [`OK`](status::OK) is success. Codes are
/// propagated verbatim through [`crate::CompatError::Device`].
pub mod status {
    /// Operation completed.
    pub const OK: i32 = 0;
    /// Board handle does not address a detected board.
    pub const ERR_BOARD: i32 = -1;
    /// The driver rejected an argument value.
    pub const ERR_VALUE: i32 = -2;
    /// A non-blocking poll found no data or event.
    pub const ERR_NOTREADY: i32 = -3;
    /// A blocking wait was unblocked by an external cancellation.
    pub const ERR_CANCELLED: i32 = -4;
    /// Generic driver failure.
    pub const ERR_DRIVER: i32 = -5;
}

/// Failure reported by an 826 driver call.
///
/// The common cases carry their own variant so adapters can branch on them
/// without magic numbers; everything else travels as the raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Non-blocking poll found nothing (`ERR_NOTREADY`). Not a fault.
    NotReady,
    /// A blocking wait was cancelled from outside (`ERR_CANCELLED`).
    Cancelled,
    /// The driver rejected an argument (`ERR_VALUE`).
    InvalidValue,
    /// Any other driver status code.
    Code(i32),
}

impl HalError {
    /// The verbatim driver status code for this failure.
    pub fn code(self) -> i32 {
        match self {
            Self::NotReady => status::ERR_NOTREADY,
            Self::Cancelled => status::ERR_CANCELLED,
            Self::InvalidValue => status::ERR_VALUE,
            Self::Code(code) => code,
        }
    }
}

/// Result type for driver calls.
pub type HalResult<T> = std::result::Result<T, HalError>;

/// Wait behavior for the driver's blocking entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Return immediately; `NotReady` if nothing is pending.
    Poll,
    /// Block up to this many driver ticks.
    Ticks(u32),
    /// Block until the event arrives or the wait is cancelled.
    #[default]
    Infinite,
}

/// Write mode for bulk digital I/O and virtual channel writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite all channels with the supplied states.
    Write,
    /// Drive high every channel whose bit is set; leave the rest alone.
    Set,
    /// Drive low every channel whose bit is set; leave the rest alone.
    Clear,
}

/// Full 48-channel digital I/O state in the 826 layout: two words of
/// 24 channels each (word 0 = channels 0-23, word 1 = channels 24-47).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DioState([u32; 2]);

impl DioState {
    /// Mask of the 24 valid bits in each word.
    pub const WORD_MASK: u32 = 0x00FF_FFFF;

    /// All channels low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from two raw words; bits above 23 are discarded.
    pub fn from_words(words: [u32; 2]) -> Self {
        Self([words[0] & Self::WORD_MASK, words[1] & Self::WORD_MASK])
    }

    /// The two 24-bit words.
    pub fn words(&self) -> [u32; 2] {
        self.0
    }

    pub(crate) fn set_word(&mut self, index: usize, value: u32) {
        self.0[index] = value & Self::WORD_MASK;
    }
}

/// Programmable gain for an ADC time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcGain {
    /// Unity gain, ±10 V span.
    X1,
    /// 2x gain, ±5 V span.
    X2,
}

/// Conversion trigger source for the ADC burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcTrigger {
    /// Free-running: a new burst starts as soon as the previous one ends.
    Continuous,
    /// Rising edge of a virtual DIO channel starts a burst.
    VirtualDio(u8),
}

/// Output span selection for a DAC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DacRange {
    /// 0 to +5 V.
    Unipolar5V,
    /// 0 to +10 V.
    Unipolar10V,
    /// -5 to +5 V.
    Bipolar5V,
    /// -10 to +10 V.
    Bipolar10V,
}

/// Firmware and software revision numbers reported by a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionInfo {
    /// API library version.
    pub api: u32,
    /// Kernel driver version.
    pub driver: u32,
    /// Board hardware revision.
    pub board: u32,
    /// FPGA image version.
    pub fpga: u32,
}

/// The five watchdog timer registers.
///
/// `delay0` is the primary timeout interval; `delay1`/`delay2` stage the
/// later reset phases; `pulse_width`/`pulse_gap` shape the output toggle
/// train. All values are in watchdog clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchdogTimers {
    /// Timeout interval (phase 0 delay).
    pub delay0: u32,
    /// Phase 1 delay.
    pub delay1: u32,
    /// Phase 2 delay.
    pub delay2: u32,
    /// Output pulse width after timeout.
    pub pulse_width: u32,
    /// Gap between output pulses.
    pub pulse_gap: u32,
}

bitflags! {
    /// Watchdog configuration flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WatchdogConfig: u32 {
        /// Toggle the watchdog output after timeout (626-style behavior).
        const PULSE_ENABLE = 1 << 0;
    }
}

bitflags! {
    /// Events that capture a counter snapshot, and the reason flags carried
    /// by a captured snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SnapshotTriggers: u32 {
        /// Count reached zero (overflow/underflow).
        const ZERO = 1 << 0;
        /// Index input rising edge.
        const IX_RISE = 1 << 1;
        /// Index input falling edge.
        const IX_FALL = 1 << 2;
        /// External input rising edge.
        const EXT_RISE = 1 << 3;
        /// External input falling edge.
        const EXT_FALL = 1 << 4;
        /// Software trigger.
        const SOFT = 1 << 5;
    }
}

/// Bit fields of the counter mode register touched by this layer.
///
/// The full mode word has many more fields; only the ones the migration
/// adapters read-modify-write are named here.
pub mod counter_mode {
    /// Count-enable trigger field (TE).
    pub const TE_MASK: u32 = 3 << 9;
    /// TE: counting runs from the moment the counter is enabled.
    pub const TE_STARTUP: u32 = 1 << 9;
    /// TE: counting starts on an index rising edge.
    pub const TE_IX_RISE: u32 = 2 << 9;
    /// Count-disable trigger field (TD).
    pub const TD_MASK: u32 = 3 << 7;
    /// TD: counting stops on an index falling edge.
    pub const TD_IX_FALL: u32 = 2 << 7;
    /// Preload when the counter becomes enabled.
    pub const PX_START: u32 = 1 << 4;
    /// Preload on overflow/underflow.
    pub const PX_ZERO: u32 = 1 << 5;
}

/// One captured counter snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Counter value at capture time.
    pub counts: u32,
    /// Free-running timestamp at capture time.
    pub timestamp: u32,
    /// Why the snapshot was captured.
    pub reason: SnapshotTriggers,
}

/// Blocking-call interface to the 826 driver.
///
/// Each method corresponds to one driver entry point. Boards are addressed
/// by handle (0-15). Methods return [`HalError`] with the driver's verbatim
/// status code on failure; the blocking reads honor [`Timeout`], with
/// [`Timeout::Poll`] returning [`HalError::NotReady`] immediately when no
/// data or event is pending.
pub trait S826Driver {
    /// Detect and open all boards. Returns a bitmask with one bit per
    /// detected board, indexed by board handle.
    fn system_open(&self) -> HalResult<u16>;

    /// Close all boards and release the driver session.
    fn system_close(&self);

    /// Read version information from one board.
    fn version_read(&self, board: u8) -> HalResult<VersionInfo>;

    /// Read the physical state of all 48 DIO channels.
    fn dio_input_read(&self, board: u8) -> HalResult<DioState>;

    /// Read back the programmed output states of all 48 DIO channels.
    fn dio_output_read(&self, board: u8) -> HalResult<DioState>;

    /// Write DIO output states in the given mode.
    fn dio_output_write(&self, board: u8, state: DioState, mode: WriteMode) -> HalResult<()>;

    /// Write virtual DIO channels (internal signals usable as triggers).
    fn virtual_write(&self, board: u8, mask: u32, mode: WriteMode) -> HalResult<()>;

    /// Configure one ADC time slot: input channel, settling time and gain.
    fn adc_slot_config_write(
        &self,
        board: u8,
        slot: u8,
        channel: u8,
        settle_us: u32,
        gain: AdcGain,
    ) -> HalResult<()>;

    /// Select which time slots participate in a conversion burst.
    fn adc_slot_list_write(&self, board: u8, slots: u16) -> HalResult<()>;

    /// Select the burst trigger source.
    fn adc_trig_mode_write(&self, board: u8, trigger: AdcTrigger) -> HalResult<()>;

    /// Enable or disable the ADC subsystem.
    fn adc_enable_write(&self, board: u8, enable: bool) -> HalResult<()>;

    /// Wait for a conversion burst and return raw samples, one per slot.
    /// Only entries for slots in `slots` are meaningful.
    fn adc_read(&self, board: u8, slots: u16, timeout: Timeout) -> HalResult<[i32; ADC_SLOTS]>;

    /// Select the output span of a DAC channel.
    fn dac_range_write(&self, board: u8, channel: u8, range: DacRange) -> HalResult<()>;

    /// Program a DAC channel with a raw 16-bit output code.
    fn dac_data_write(&self, board: u8, channel: u8, value: u16) -> HalResult<()>;

    /// Program the watchdog configuration and timer registers.
    fn watchdog_config_write(
        &self,
        board: u8,
        config: WatchdogConfig,
        timers: WatchdogTimers,
    ) -> HalResult<()>;

    /// Read back the watchdog configuration and timer registers.
    fn watchdog_config_read(&self, board: u8) -> HalResult<(WatchdogConfig, WatchdogTimers)>;

    /// Enable or disable the watchdog.
    fn watchdog_enable_write(&self, board: u8, enable: bool) -> HalResult<()>;

    /// Read back the watchdog enable state.
    fn watchdog_enable_read(&self, board: u8) -> HalResult<bool>;

    /// Restart the watchdog interval. `key` is the anti-spurious-write
    /// protection value the driver requires.
    fn watchdog_kick(&self, board: u8, key: u32) -> HalResult<()>;

    /// Wait for a watchdog timeout event.
    fn watchdog_event_wait(&self, board: u8, timeout: Timeout) -> HalResult<()>;

    /// Read a counter's mode register.
    fn counter_mode_read(&self, board: u8, channel: u8) -> HalResult<u32>;

    /// Write a counter's mode register.
    fn counter_mode_write(&self, board: u8, channel: u8, mode: u32) -> HalResult<()>;

    /// Write one of a counter's two preload registers.
    fn counter_preload_write(
        &self,
        board: u8,
        channel: u8,
        register: u8,
        value: u32,
    ) -> HalResult<()>;

    /// Wait for and consume the oldest snapshot in a counter's FIFO.
    fn counter_snapshot_read(
        &self,
        board: u8,
        channel: u8,
        timeout: Timeout,
    ) -> HalResult<CounterSnapshot>;

    /// Select the events that capture counter snapshots.
    fn counter_snapshot_config_write(
        &self,
        board: u8,
        channel: u8,
        triggers: SnapshotTriggers,
        mode: WriteMode,
    ) -> HalResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_error_codes() {
        assert_eq!(HalError::NotReady.code(), status::ERR_NOTREADY);
        assert_eq!(HalError::Cancelled.code(), status::ERR_CANCELLED);
        assert_eq!(HalError::InvalidValue.code(), status::ERR_VALUE);
        assert_eq!(HalError::Code(-42).code(), -42);
    }

    #[test]
    fn test_dio_state_masks_to_24_bits() {
        let state = DioState::from_words([0xFFFF_FFFF, 0x1F00_BEEF]);
        assert_eq!(state.words(), [0x00FF_FFFF, 0x0000_BEEF]);
    }

    #[test]
    fn test_counter_mode_fields_do_not_overlap() {
        assert_eq!(counter_mode::TE_MASK & counter_mode::TD_MASK, 0);
        assert_eq!(counter_mode::TE_STARTUP & counter_mode::TE_MASK, counter_mode::TE_STARTUP);
        assert_eq!(counter_mode::TD_IX_FALL & counter_mode::TD_MASK, counter_mode::TD_IX_FALL);
        assert_eq!((counter_mode::PX_START | counter_mode::PX_ZERO) & counter_mode::TE_MASK, 0);
    }
}
