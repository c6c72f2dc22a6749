//! Analog input: legacy poll lists on the 826 time-slot engine.
//!
//! A 626 poll list is a byte array, one entry per conversion, terminated by
//! an end-of-poll-list marker bit in the final entry. Each entry becomes
//! one 826 time slot with a fixed settling time and a translated gain. The
//! burst itself is started by pulsing a virtual DIO channel that the slot
//! engine is configured to trigger on, and collected with a blocking read.

use crate::error::{CompatError, Result};
use crate::hal::{AdcGain, AdcTrigger, S826Driver, Timeout, WriteMode, ADC_SLOTS};
use crate::session::Session;

/// Per-slot settling time programmed for every poll list entry, in
/// microseconds.
pub const ADC_SETTLE_US: u32 = 15;

/// Virtual DIO channel used as the conversion burst trigger.
const TRIGGER_VDIO: u8 = 0;
const TRIGGER_MASK: u32 = 1 << TRIGGER_VDIO;

/// Input range selection of a poll list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollRange {
    /// ±10 V input span.
    Bipolar10V,
    /// ±5 V input span.
    Bipolar5V,
}

impl PollRange {
    /// The 826 gain code realizing this span.
    pub fn gain(self) -> AdcGain {
        match self {
            Self::Bipolar10V => AdcGain::X1,
            Self::Bipolar5V => AdcGain::X2,
        }
    }
}

/// One legacy poll list entry.
///
/// Byte layout: bit 7 = end-of-poll-list marker, bit 4 = ±5 V range flag,
/// bits 3:0 = channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollEntry(u8);

impl PollEntry {
    /// End-of-poll-list marker bit.
    pub const EOPL: u8 = 0x80;
    /// Range flag bit: set selects ±5 V, clear selects ±10 V.
    pub const RANGE_5V: u8 = 0x10;
    /// Channel number mask.
    pub const CHAN_MASK: u8 = 0x0F;

    /// Build an entry for one channel and range. Channel bits above the
    /// 4-bit field are discarded, as the 626 hardware did.
    pub fn new(channel: u8, range: PollRange) -> Self {
        let range_bit = match range {
            PollRange::Bipolar10V => 0,
            PollRange::Bipolar5V => Self::RANGE_5V,
        };
        Self((channel & Self::CHAN_MASK) | range_bit)
    }

    /// This entry with the end-of-poll-list marker set.
    pub fn last(self) -> Self {
        Self(self.0 | Self::EOPL)
    }

    /// Channel number (0-15).
    pub fn channel(self) -> u8 {
        self.0 & Self::CHAN_MASK
    }

    /// Input range selected by this entry.
    pub fn range(self) -> PollRange {
        if self.0 & Self::RANGE_5V != 0 {
            PollRange::Bipolar5V
        } else {
            PollRange::Bipolar10V
        }
    }

    /// True if this entry carries the end-of-poll-list marker.
    pub fn is_last(self) -> bool {
        self.0 & Self::EOPL != 0
    }

    /// The raw legacy byte.
    pub fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for PollEntry {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl<D: S826Driver> Session<D> {
    /// Translate and install a legacy poll list.
    ///
    /// Replaces `S626_ResetADC()`. Disables the ADC, programs one time slot
    /// per entry in list order up to and including the first entry with the
    /// end-of-poll-list marker, rewrites the board's slot list wholesale,
    /// selects the virtual-DIO burst trigger and re-enables the ADC.
    ///
    /// A failing driver call aborts the operation with that call's error;
    /// slots programmed before the failure are left programmed (there is no
    /// rollback, matching the original behavior). Lists that run past the
    /// 16 hardware slots, or end without a marker, are rejected before the
    /// offending slot is touched.
    pub fn reset_adc(&mut self, board: u8, poll_list: &[PollEntry]) -> Result<()> {
        self.check_board(board)?;

        self.adc_slots[usize::from(board)] = 0;
        self.driver.adc_enable_write(board, false)?;

        let mut terminated = false;
        for (slot, entry) in poll_list.iter().enumerate() {
            if slot >= ADC_SLOTS {
                return Err(CompatError::PollListTooLong);
            }
            self.driver.adc_slot_config_write(
                board,
                slot as u8,
                entry.channel(),
                ADC_SETTLE_US,
                entry.range().gain(),
            )?;
            self.adc_slots[usize::from(board)] |= 1 << slot;
            if entry.is_last() {
                terminated = true;
                break;
            }
        }
        if !terminated {
            return Err(CompatError::MissingEndOfList);
        }

        let slots = self.adc_slots[usize::from(board)];
        self.driver.adc_slot_list_write(board, slots)?;
        self.driver
            .adc_trig_mode_write(board, AdcTrigger::VirtualDio(TRIGGER_VDIO))?;
        self.driver.adc_enable_write(board, true)?;
        Ok(())
    }

    /// Start one conversion burst.
    ///
    /// Replaces `S626_StartADC()`: asserts and then negates the virtual
    /// trigger channel, so the slot engine sees one rising edge.
    pub fn start_adc(&self, board: u8) -> Result<()> {
        self.check_board(board)?;
        self.driver
            .virtual_write(board, TRIGGER_MASK, WriteMode::Set)?;
        self.driver
            .virtual_write(board, TRIGGER_MASK, WriteMode::Clear)?;
        Ok(())
    }

    /// Block until the burst completes and return the samples.
    ///
    /// Replaces `S626_WaitDoneADC()`. Waits on the slots installed by the
    /// last [`reset_adc`](Self::reset_adc) with no timeout; each raw sample
    /// is narrowed to its signed low 16 bits, the 626 data format. Slots
    /// outside the programmed list read as zero.
    ///
    /// One divergence from the original migration aid: its collection loop
    /// copied only the first 15 of the 16 slots, which reads as an
    /// off-by-one rather than intent. All 16 slots are converted here, so a
    /// full-length poll list sees its last sample instead of a stale zero.
    pub fn wait_done_adc(&self, board: u8) -> Result<[i16; ADC_SLOTS]> {
        self.check_board(board)?;
        let slots = self.adc_slots[usize::from(board)];
        let raw = self.driver.adc_read(board, slots, Timeout::Infinite)?;

        let mut samples = [0i16; ADC_SLOTS];
        for (sample, value) in samples.iter_mut().zip(raw.iter()) {
            *sample = (value & 0xFFFF) as i16;
        }
        Ok(samples)
    }

    /// Start a burst and block for its samples.
    ///
    /// Replaces `S626_ReadADC()`: [`start_adc`](Self::start_adc) then
    /// [`wait_done_adc`](Self::wait_done_adc), short-circuiting on the
    /// first failure.
    pub fn read_adc(&self, board: u8) -> Result<[i16; ADC_SLOTS]> {
        self.start_adc(board)?;
        self.wait_done_adc(board)
    }
}
