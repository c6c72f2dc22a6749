//! Simulated 826 board for porting tests.
//!
//! [`MockBoard`] implements [`S826Driver`] entirely in memory and records
//! every driver call it receives, so test suites of ported applications can
//! assert not just on results but on the exact call sequence the migration
//! layer issued. Handles are cheaply cloneable and share state, which lets
//! a test keep a handle after the session takes ownership of the driver.
//!
//! The mock never blocks: blocking reads evaluate immediately against the
//! simulated state, and a watchdog timeout is reached by advancing the
//! virtual clock with [`MockBoard::advance_ms`]. Failures can be injected
//! at any point in the call sequence with [`MockBoard::fail_nth_call`], and
//! [`MockBoard::cancel_waits`] makes every wait report an external
//! cancellation.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    AdcGain, AdcTrigger, CounterSnapshot, DacRange, DioState, HalError, HalResult, S826Driver,
    SnapshotTriggers, Timeout, VersionInfo, WatchdogConfig, WatchdogTimers, WriteMode, ADC_SLOTS,
    COUNTER_CHANNELS, MAX_BOARDS,
};
use crate::timing::WD_INTERVAL_SCALAR;

/// One recorded driver call, with the arguments that matter for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    /// `system_open`
    SystemOpen,
    /// `system_close`
    SystemClose,
    /// `version_read`
    VersionRead {
        /// Board handle.
        board: u8,
    },
    /// `dio_input_read`
    DioInputRead {
        /// Board handle.
        board: u8,
    },
    /// `dio_output_read`
    DioOutputRead {
        /// Board handle.
        board: u8,
    },
    /// `dio_output_write`
    DioOutputWrite {
        /// Board handle.
        board: u8,
        /// Channel states written.
        state: DioState,
        /// Write mode used.
        mode: WriteMode,
    },
    /// `virtual_write`
    VirtualWrite {
        /// Board handle.
        board: u8,
        /// Virtual channel mask.
        mask: u32,
        /// Write mode used.
        mode: WriteMode,
    },
    /// `adc_slot_config_write`
    AdcSlotConfig {
        /// Board handle.
        board: u8,
        /// Time slot programmed.
        slot: u8,
        /// Input channel selected.
        channel: u8,
        /// Settling time in microseconds.
        settle_us: u32,
        /// Gain selected.
        gain: AdcGain,
    },
    /// `adc_slot_list_write`
    AdcSlotList {
        /// Board handle.
        board: u8,
        /// Participating slot mask.
        slots: u16,
    },
    /// `adc_trig_mode_write`
    AdcTrigMode {
        /// Board handle.
        board: u8,
        /// Selected trigger source.
        trigger: AdcTrigger,
    },
    /// `adc_enable_write`
    AdcEnable {
        /// Board handle.
        board: u8,
        /// New enable state.
        enable: bool,
    },
    /// `adc_read`
    AdcRead {
        /// Board handle.
        board: u8,
        /// Slot mask waited on.
        slots: u16,
        /// Wait behavior requested.
        timeout: Timeout,
    },
    /// `dac_range_write`
    DacRange {
        /// Board handle.
        board: u8,
        /// DAC channel.
        channel: u8,
        /// Selected span.
        range: DacRange,
    },
    /// `dac_data_write`
    DacData {
        /// Board handle.
        board: u8,
        /// DAC channel.
        channel: u8,
        /// Raw output code.
        value: u16,
    },
    /// `watchdog_config_write`
    WatchdogConfigWrite {
        /// Board handle.
        board: u8,
        /// Configuration flags written.
        config: WatchdogConfig,
        /// Timer registers written.
        timers: WatchdogTimers,
    },
    /// `watchdog_config_read`
    WatchdogConfigRead {
        /// Board handle.
        board: u8,
    },
    /// `watchdog_enable_write`
    WatchdogEnable {
        /// Board handle.
        board: u8,
        /// New enable state.
        enable: bool,
    },
    /// `watchdog_enable_read`
    WatchdogEnableRead {
        /// Board handle.
        board: u8,
    },
    /// `watchdog_kick`
    WatchdogKick {
        /// Board handle.
        board: u8,
        /// Protection key supplied.
        key: u32,
    },
    /// `watchdog_event_wait`
    WatchdogEventWait {
        /// Board handle.
        board: u8,
        /// Wait behavior requested.
        timeout: Timeout,
    },
    /// `counter_mode_read`
    CounterModeRead {
        /// Board handle.
        board: u8,
        /// Counter channel.
        channel: u8,
    },
    /// `counter_mode_write`
    CounterModeWrite {
        /// Board handle.
        board: u8,
        /// Counter channel.
        channel: u8,
        /// Mode word written.
        mode: u32,
    },
    /// `counter_preload_write`
    CounterPreload {
        /// Board handle.
        board: u8,
        /// Counter channel.
        channel: u8,
        /// Preload register index.
        register: u8,
        /// Value written.
        value: u32,
    },
    /// `counter_snapshot_read`
    CounterSnapshotRead {
        /// Board handle.
        board: u8,
        /// Counter channel.
        channel: u8,
        /// Wait behavior requested.
        timeout: Timeout,
    },
    /// `counter_snapshot_config_write`
    CounterSnapshotConfig {
        /// Board handle.
        board: u8,
        /// Counter channel.
        channel: u8,
        /// Trigger events written.
        triggers: SnapshotTriggers,
        /// Write mode used.
        mode: WriteMode,
    },
}

/// Configuration programmed into one ADC time slot of the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcSlotConfig {
    /// Input channel.
    pub channel: u8,
    /// Settling time in microseconds.
    pub settle_us: u32,
    /// Programmed gain.
    pub gain: AdcGain,
}

#[derive(Debug, Clone, Default)]
struct MockCounter {
    mode: u32,
    preload: [u32; 2],
    triggers: SnapshotTriggers,
    fifo: VecDeque<CounterSnapshot>,
}

struct MockState {
    detected: u16,
    calls: Vec<MockCall>,
    fail_at: Option<(usize, HalError)>,
    cancel_waits: bool,
    versions: VersionInfo,
    dio_out: DioState,
    dio_in: Option<DioState>,
    virtual_out: u32,
    adc_slots: [Option<AdcSlotConfig>; ADC_SLOTS],
    adc_slot_list: u16,
    adc_trigger: Option<AdcTrigger>,
    adc_enabled: bool,
    adc_samples: [i32; ADC_SLOTS],
    burst_armed: bool,
    dac_ranges: [Option<DacRange>; 4],
    dac_values: [Option<u16>; 4],
    wd_config: WatchdogConfig,
    wd_timers: WatchdogTimers,
    wd_enabled: bool,
    wd_elapsed_ms: u64,
    counters: [MockCounter; 6],
    timestamp: u32,
}

impl MockState {
    fn new(detected: u16) -> Self {
        Self {
            detected,
            calls: Vec::new(),
            fail_at: None,
            cancel_waits: false,
            versions: VersionInfo {
                api: 0x0401,
                driver: 0x0205,
                board: 3,
                fpga: 0x0107,
            },
            dio_out: DioState::new(),
            dio_in: None,
            virtual_out: 0,
            adc_slots: [None; ADC_SLOTS],
            adc_slot_list: 0,
            adc_trigger: None,
            adc_enabled: false,
            adc_samples: [0; ADC_SLOTS],
            burst_armed: false,
            dac_ranges: [None; 4],
            dac_values: [None; 4],
            wd_config: WatchdogConfig::empty(),
            wd_timers: WatchdogTimers::default(),
            wd_enabled: false,
            wd_elapsed_ms: 0,
            counters: Default::default(),
            timestamp: 0,
        }
    }

    /// Record a call, honoring any injected failure at this position.
    fn record(&mut self, call: MockCall) -> HalResult<()> {
        let index = self.calls.len();
        self.calls.push(call);
        if let Some((at, err)) = self.fail_at {
            if index == at {
                self.fail_at = None;
                return Err(err);
            }
        }
        Ok(())
    }

    fn wd_timed_out(&self) -> bool {
        self.wd_enabled
            && self.wd_timers.delay0 > 0
            && self.wd_elapsed_ms * u64::from(WD_INTERVAL_SCALAR) >= u64::from(self.wd_timers.delay0)
    }
}

/// In-memory 826 board simulation with call recording.
#[derive(Clone)]
pub struct MockBoard {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBoard {
    /// A mock system with board 0 detected.
    pub fn new() -> Self {
        Self::with_boards(0b1)
    }

    /// A mock system with the given detection mask.
    pub fn with_boards(detected: u16) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::new(detected))),
        }
    }

    /// All driver calls received so far, oldest first. Failed calls are
    /// recorded too: the log reflects attempts, not successes.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Discard the recorded call log.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Make the `n`-th driver call from now fail with `err` (0 = the very
    /// next call). One-shot: later calls succeed again.
    pub fn fail_nth_call(&self, n: usize, err: HalError) {
        let mut state = self.state.lock();
        state.fail_at = Some((state.calls.len() + n, err));
    }

    /// When set, every blocking wait reports [`HalError::Cancelled`].
    pub fn cancel_waits(&self, cancel: bool) {
        self.state.lock().cancel_waits = cancel;
    }

    /// Override the physical DIO input states (default: loopback of the
    /// output latch).
    pub fn set_inputs(&self, inputs: DioState) {
        self.state.lock().dio_in = Some(inputs);
    }

    /// Current DIO output latch.
    pub fn outputs(&self) -> DioState {
        self.state.lock().dio_out
    }

    /// Set the raw samples the next ADC burst will return.
    pub fn set_samples(&self, samples: [i32; ADC_SLOTS]) {
        self.state.lock().adc_samples = samples;
    }

    /// Last raw code written to a DAC channel, if any.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not a DAC channel (0-3).
    pub fn dac_value(&self, channel: u8) -> Option<u16> {
        assert!(usize::from(channel) < 4, "DAC channel out of range: {channel}");
        self.state.lock().dac_values[usize::from(channel)]
    }

    /// Advance the virtual watchdog clock.
    pub fn advance_ms(&self, ms: u64) {
        self.state.lock().wd_elapsed_ms += ms;
    }

    /// Seed a counter mode register directly (bypasses the call log).
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not a counter channel (0-5).
    pub fn seed_counter_mode(&self, channel: u8, mode: u32) {
        Self::check_counter_channel(channel);
        self.state.lock().counters[usize::from(channel)].mode = mode;
    }

    /// Push a snapshot into a counter's FIFO directly.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not a counter channel (0-5).
    pub fn push_snapshot(&self, channel: u8, snapshot: CounterSnapshot) {
        Self::check_counter_channel(channel);
        self.state.lock().counters[usize::from(channel)]
            .fifo
            .push_back(snapshot);
    }

    /// Snapshot trigger configuration of a counter.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not a counter channel (0-5).
    pub fn snapshot_triggers(&self, channel: u8) -> SnapshotTriggers {
        Self::check_counter_channel(channel);
        self.state.lock().counters[usize::from(channel)].triggers
    }

    /// Mode register of a counter.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not a counter channel (0-5).
    pub fn counter_mode(&self, channel: u8) -> u32 {
        Self::check_counter_channel(channel);
        self.state.lock().counters[usize::from(channel)].mode
    }

    /// Configuration programmed into an ADC time slot, if any.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a hardware time slot (0-15).
    pub fn adc_slot(&self, slot: u8) -> Option<AdcSlotConfig> {
        assert!(usize::from(slot) < ADC_SLOTS, "ADC slot out of range: {slot}");
        self.state.lock().adc_slots[usize::from(slot)]
    }

    /// Slot mask last written with `adc_slot_list_write`.
    pub fn adc_slot_list(&self) -> u16 {
        self.state.lock().adc_slot_list
    }

    /// Span last selected for a DAC channel, if any.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not a DAC channel (0-3).
    pub fn dac_range(&self, channel: u8) -> Option<DacRange> {
        assert!(usize::from(channel) < 4, "DAC channel out of range: {channel}");
        self.state.lock().dac_ranges[usize::from(channel)]
    }

    /// Value of one counter preload register.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not a counter channel (0-5) or `register` is
    /// not a preload register (0-1).
    pub fn preload(&self, channel: u8, register: u8) -> u32 {
        Self::check_counter_channel(channel);
        assert!(usize::from(register) < 2, "preload register out of range: {register}");
        self.state.lock().counters[usize::from(channel)].preload[usize::from(register)]
    }

    fn check_counter_channel(channel: u8) {
        assert!(
            channel < COUNTER_CHANNELS,
            "counter channel out of range: {channel}"
        );
    }
}

fn apply_mode(current: u32, value: u32, mode: WriteMode) -> u32 {
    match mode {
        WriteMode::Write => value,
        WriteMode::Set => current | value,
        WriteMode::Clear => current & !value,
    }
}

impl S826Driver for MockBoard {
    fn system_open(&self) -> HalResult<u16> {
        let mut state = self.state.lock();
        state.record(MockCall::SystemOpen)?;
        Ok(state.detected)
    }

    fn system_close(&self) {
        let mut state = self.state.lock();
        // Infallible by contract; the injection gate is bypassed.
        state.calls.push(MockCall::SystemClose);
    }

    fn version_read(&self, board: u8) -> HalResult<VersionInfo> {
        let mut state = self.state.lock();
        state.record(MockCall::VersionRead { board })?;
        if usize::from(board) >= MAX_BOARDS || state.detected & (1 << board) == 0 {
            return Err(HalError::Code(super::status::ERR_BOARD));
        }
        Ok(state.versions)
    }

    fn dio_input_read(&self, board: u8) -> HalResult<DioState> {
        let mut state = self.state.lock();
        state.record(MockCall::DioInputRead { board })?;
        Ok(state.dio_in.unwrap_or(state.dio_out))
    }

    fn dio_output_read(&self, board: u8) -> HalResult<DioState> {
        let mut state = self.state.lock();
        state.record(MockCall::DioOutputRead { board })?;
        Ok(state.dio_out)
    }

    fn dio_output_write(&self, board: u8, write: DioState, mode: WriteMode) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::DioOutputWrite {
            board,
            state: write,
            mode,
        })?;
        let current = state.dio_out.words();
        let incoming = write.words();
        let mut next = DioState::new();
        for word in 0..2 {
            next.set_word(word, apply_mode(current[word], incoming[word], mode));
        }
        state.dio_out = next;
        Ok(())
    }

    fn virtual_write(&self, board: u8, mask: u32, mode: WriteMode) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::VirtualWrite { board, mask, mode })?;
        let before = state.virtual_out;
        state.virtual_out = apply_mode(before, mask, mode);
        // A rising edge on the configured virtual trigger channel starts a
        // conversion burst.
        if let Some(AdcTrigger::VirtualDio(chan)) = state.adc_trigger {
            let bit = 1u32 << chan;
            if state.adc_enabled && before & bit == 0 && state.virtual_out & bit != 0 {
                state.burst_armed = true;
            }
        }
        Ok(())
    }

    fn adc_slot_config_write(
        &self,
        board: u8,
        slot: u8,
        channel: u8,
        settle_us: u32,
        gain: AdcGain,
    ) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::AdcSlotConfig {
            board,
            slot,
            channel,
            settle_us,
            gain,
        })?;
        if usize::from(slot) >= ADC_SLOTS {
            return Err(HalError::InvalidValue);
        }
        state.adc_slots[usize::from(slot)] = Some(AdcSlotConfig {
            channel,
            settle_us,
            gain,
        });
        Ok(())
    }

    fn adc_slot_list_write(&self, board: u8, slots: u16) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::AdcSlotList { board, slots })?;
        state.adc_slot_list = slots;
        Ok(())
    }

    fn adc_trig_mode_write(&self, board: u8, trigger: AdcTrigger) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::AdcTrigMode { board, trigger })?;
        state.adc_trigger = Some(trigger);
        Ok(())
    }

    fn adc_enable_write(&self, board: u8, enable: bool) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::AdcEnable { board, enable })?;
        state.adc_enabled = enable;
        if !enable {
            state.burst_armed = false;
        }
        Ok(())
    }

    fn adc_read(&self, board: u8, slots: u16, timeout: Timeout) -> HalResult<[i32; ADC_SLOTS]> {
        let mut state = self.state.lock();
        state.record(MockCall::AdcRead {
            board,
            slots,
            timeout,
        })?;
        if state.cancel_waits {
            return Err(HalError::Cancelled);
        }
        if matches!(timeout, Timeout::Poll) && !state.burst_armed {
            return Err(HalError::NotReady);
        }
        // The simulated burst completes instantly once triggered (or, for a
        // blocking read, as soon as it is waited on).
        state.burst_armed = false;
        Ok(state.adc_samples)
    }

    fn dac_range_write(&self, board: u8, channel: u8, range: DacRange) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::DacRange {
            board,
            channel,
            range,
        })?;
        if usize::from(channel) >= 4 {
            return Err(HalError::InvalidValue);
        }
        state.dac_ranges[usize::from(channel)] = Some(range);
        Ok(())
    }

    fn dac_data_write(&self, board: u8, channel: u8, value: u16) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::DacData {
            board,
            channel,
            value,
        })?;
        if usize::from(channel) >= 4 {
            return Err(HalError::InvalidValue);
        }
        state.dac_values[usize::from(channel)] = Some(value);
        Ok(())
    }

    fn watchdog_config_write(
        &self,
        board: u8,
        config: WatchdogConfig,
        timers: WatchdogTimers,
    ) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::WatchdogConfigWrite {
            board,
            config,
            timers,
        })?;
        state.wd_config = config;
        state.wd_timers = timers;
        Ok(())
    }

    fn watchdog_config_read(&self, board: u8) -> HalResult<(WatchdogConfig, WatchdogTimers)> {
        let mut state = self.state.lock();
        state.record(MockCall::WatchdogConfigRead { board })?;
        Ok((state.wd_config, state.wd_timers))
    }

    fn watchdog_enable_write(&self, board: u8, enable: bool) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::WatchdogEnable { board, enable })?;
        state.wd_enabled = enable;
        if enable {
            state.wd_elapsed_ms = 0;
        }
        Ok(())
    }

    fn watchdog_enable_read(&self, board: u8) -> HalResult<bool> {
        let mut state = self.state.lock();
        state.record(MockCall::WatchdogEnableRead { board })?;
        Ok(state.wd_enabled)
    }

    fn watchdog_kick(&self, board: u8, key: u32) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::WatchdogKick { board, key })?;
        state.wd_elapsed_ms = 0;
        Ok(())
    }

    fn watchdog_event_wait(&self, board: u8, timeout: Timeout) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::WatchdogEventWait { board, timeout })?;
        if state.cancel_waits {
            return Err(HalError::Cancelled);
        }
        if state.wd_timed_out() {
            Ok(())
        } else {
            // Never block: without a pending timeout the wait reports
            // not-ready regardless of the requested timeout.
            Err(HalError::NotReady)
        }
    }

    fn counter_mode_read(&self, board: u8, channel: u8) -> HalResult<u32> {
        let mut state = self.state.lock();
        state.record(MockCall::CounterModeRead { board, channel })?;
        if channel >= COUNTER_CHANNELS {
            return Err(HalError::InvalidValue);
        }
        Ok(state.counters[usize::from(channel)].mode)
    }

    fn counter_mode_write(&self, board: u8, channel: u8, mode: u32) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::CounterModeWrite {
            board,
            channel,
            mode,
        })?;
        if channel >= COUNTER_CHANNELS {
            return Err(HalError::InvalidValue);
        }
        state.counters[usize::from(channel)].mode = mode;
        Ok(())
    }

    fn counter_preload_write(
        &self,
        board: u8,
        channel: u8,
        register: u8,
        value: u32,
    ) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::CounterPreload {
            board,
            channel,
            register,
            value,
        })?;
        if channel >= COUNTER_CHANNELS || usize::from(register) >= 2 {
            return Err(HalError::InvalidValue);
        }
        state.counters[usize::from(channel)].preload[usize::from(register)] = value;
        // Preloading register 0 doubles as the soft capture trigger: the
        // migration layer uses it to emulate the 626 soft index.
        if register == 0 {
            state.timestamp = state.timestamp.wrapping_add(1);
            let snapshot = CounterSnapshot {
                counts: value,
                timestamp: state.timestamp,
                reason: SnapshotTriggers::SOFT,
            };
            state.counters[usize::from(channel)].fifo.push_back(snapshot);
        }
        Ok(())
    }

    fn counter_snapshot_read(
        &self,
        board: u8,
        channel: u8,
        timeout: Timeout,
    ) -> HalResult<CounterSnapshot> {
        let mut state = self.state.lock();
        state.record(MockCall::CounterSnapshotRead {
            board,
            channel,
            timeout,
        })?;
        if channel >= COUNTER_CHANNELS {
            return Err(HalError::InvalidValue);
        }
        if state.cancel_waits {
            return Err(HalError::Cancelled);
        }
        state.counters[usize::from(channel)]
            .fifo
            .pop_front()
            .ok_or(HalError::NotReady)
    }

    fn counter_snapshot_config_write(
        &self,
        board: u8,
        channel: u8,
        triggers: SnapshotTriggers,
        mode: WriteMode,
    ) -> HalResult<()> {
        let mut state = self.state.lock();
        state.record(MockCall::CounterSnapshotConfig {
            board,
            channel,
            triggers,
            mode,
        })?;
        if channel >= COUNTER_CHANNELS {
            return Err(HalError::InvalidValue);
        }
        let current = state.counters[usize::from(channel)].triggers;
        state.counters[usize::from(channel)].triggers = SnapshotTriggers::from_bits_truncate(
            apply_mode(current.bits(), triggers.bits(), mode),
        );
        Ok(())
    }
}
