//! Counters: 626 A/B latch model on the 826 snapshot engine.
//!
//! The two counter architectures differ enough that only part of the 626
//! surface translates. The 626 samples a counter into a latch register and
//! reads the latch; the 826 captures snapshots (count + timestamp + reason
//! flags) into a per-counter FIFO. The adapters here map what translates
//! cleanly, emulate the latch read with a non-blocking snapshot read, and
//! report the rest as unsupported with a pointer at the snapshot engine.

use crate::error::{CompatError, Result};
use crate::hal::{
    counter_mode, S826Driver, SnapshotTriggers, Timeout, WriteMode, COUNTER_CHANNELS,
};
use crate::session::{log_best_effort, Session};

/// Legacy count-enable gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEnable {
    /// Count from the moment the counter is enabled (CLKENAB_ALWAYS).
    Always,
    /// Count only while gated by the index input (CLKENAB_INDEX).
    WhileIndex,
}

impl TryFrom<u16> for CounterEnable {
    type Error = CompatError;

    fn try_from(code: u16) -> Result<Self> {
        match code {
            0 => Ok(Self::Always),
            1 => Ok(Self::WhileIndex),
            _ => Err(CompatError::InvalidCode { code, max: 1 }),
        }
    }
}

/// Legacy latch trigger source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchSource {
    /// Latch on read (LATCHSRC_AB_READ).
    OnRead,
    /// Latch counter A on its own index (LATCHSRC_A_INDXA).
    AOnIndexA,
    /// Latch counter B on its own index (LATCHSRC_B_INDXB).
    BOnIndexB,
    /// Latch counter B on counter A overflow (LATCHSRC_B_OVERA).
    BOnOverflowA,
}

impl TryFrom<u16> for LatchSource {
    type Error = CompatError;

    fn try_from(code: u16) -> Result<Self> {
        match code {
            0 => Ok(Self::OnRead),
            1 => Ok(Self::AOnIndexA),
            2 => Ok(Self::BOnIndexB),
            3 => Ok(Self::BOnOverflowA),
            _ => Err(CompatError::InvalidCode { code, max: 3 }),
        }
    }
}

impl<D: S826Driver> Session<D> {
    /// Software-trigger a counter sample.
    ///
    /// Replaces `S626_CounterSoftIndex()`: writing preload register 0
    /// captures a snapshot (count, timestamp, reason flags) into the
    /// counter's FIFO.
    pub fn counter_soft_index(&self, board: u8, channel: u8) -> Result<()> {
        self.check_counter(board, channel)?;
        Ok(self.driver.counter_preload_write(board, channel, 0, 0)?)
    }

    /// Write a counter's preload value.
    ///
    /// Replaces `S626_CounterPreload()`, using the 826's preload register 0.
    /// Note the width difference: 626 counters are 24-bit, 826 counters are
    /// 32-bit; the value is passed through unchanged.
    pub fn counter_preload(&self, board: u8, channel: u8, value: u32) -> Result<()> {
        self.check_counter(board, channel)?;
        Ok(self.driver.counter_preload_write(board, channel, 0, value)?)
    }

    /// Read the most recent sampled count.
    ///
    /// Replaces `S626_CounterReadLatch()`. The 626 latch register is
    /// emulated with a non-blocking read of the snapshot FIFO, so the call
    /// never blocks; an empty FIFO is a legitimate
    /// [`NotReady`](crate::CompatError::NotReady) result. Emits one
    /// diagnostic per call because the emulation consumes FIFO entries,
    /// where the 626 latch could be re-read.
    pub fn counter_read_latch(&self, board: u8, channel: u8) -> Result<u32> {
        self.check_counter(board, channel)?;
        self.notify(
            "S626_CounterReadLatch(): latch register is emulated by a non-blocking \
             S826_CounterSnapshotRead(); each read consumes one snapshot",
        );
        let snapshot = self
            .driver
            .counter_snapshot_read(board, channel, Timeout::Poll)?;
        Ok(snapshot.counts)
    }

    /// Gate when a counter counts.
    ///
    /// Replaces `S626_CounterEnableSet()` with a read-modify-write of the
    /// mode word's count-enable trigger fields. The index-gated form maps
    /// to enable-on-index-rise / disable-on-index-fall and warns, because
    /// the effective polarity depends on the wiring.
    pub fn counter_enable_set(&self, board: u8, channel: u8, enable: CounterEnable) -> Result<()> {
        self.check_counter(board, channel)?;
        let mut mode = self.driver.counter_mode_read(board, channel)?;
        mode &= !(counter_mode::TE_MASK | counter_mode::TD_MASK);
        match enable {
            CounterEnable::Always => mode |= counter_mode::TE_STARTUP,
            CounterEnable::WhileIndex => {
                mode |= counter_mode::TE_IX_RISE | counter_mode::TD_IX_FALL;
                self.notify(
                    "S626_CounterEnableSet(CLKENAB_INDEX): gating maps to index \
                     rise/fall triggers; check the index polarity",
                );
            }
        }
        Ok(self.driver.counter_mode_write(board, channel, mode)?)
    }

    /// Select the events that sample a counter.
    ///
    /// Replaces `S626_CounterLatchSourceSet()` by configuring snapshot
    /// triggers. The two cross-counter sources (`BOnIndexB`,
    /// `BOnOverflowA`) rely on the 626's paired A/B architecture and have
    /// no equivalent on the 826's six identical counters: they perform no
    /// device action and fail as unsupported, with a hint naming the
    /// closest rewiring.
    pub fn counter_latch_source_set(
        &self,
        board: u8,
        channel: u8,
        source: LatchSource,
    ) -> Result<()> {
        self.check_counter(board, channel)?;
        match source {
            LatchSource::OnRead => Ok(self.driver.counter_snapshot_config_write(
                board,
                channel,
                SnapshotTriggers::empty(),
                WriteMode::Write,
            )?),
            LatchSource::AOnIndexA => {
                self.notify(
                    "S626_CounterLatchSourceSet(LATCHSRC_A_INDXA): sampling on index \
                     rising edge; check the index polarity",
                );
                Ok(self.driver.counter_snapshot_config_write(
                    board,
                    channel,
                    SnapshotTriggers::IX_RISE,
                    WriteMode::Write,
                )?)
            }
            LatchSource::BOnIndexB => {
                let err = CompatError::Unsupported {
                    operation: "S626_CounterLatchSourceSet(LATCHSRC_B_INDXB)",
                    hint: "index-rise snapshot triggers on a separate counter channel",
                };
                self.notify(&err.to_string());
                Err(err)
            }
            LatchSource::BOnOverflowA => {
                let err = CompatError::Unsupported {
                    operation: "S626_CounterLatchSourceSet(LATCHSRC_B_OVERA)",
                    hint: "wiring one counter's output to another counter's ExtIn",
                };
                self.notify(&err.to_string());
                Err(err)
            }
        }
    }

    /// Select the events that preload a counter.
    ///
    /// Replaces `S626_CounterLoadTrigSet()`. The 626 load-source word does
    /// not translate field-for-field; this adapter emits a diagnostic and
    /// installs one representative configuration (preload at start and on
    /// overflow/underflow), which ported code almost always needs adjusted.
    /// Legacy shape is void, so a failing best-effort write is logged, not
    /// returned.
    pub fn counter_load_trig_set(&self, board: u8, channel: u8, _load_src: u16) {
        if self.check_counter(board, channel).is_err() {
            return;
        }
        self.notify(
            "S626_CounterLoadTrigSet() has no 826 equivalent; see the TP, NR and BP \
             fields of S826_CounterModeWrite()",
        );
        log_best_effort(
            self.driver.counter_mode_write(
                board,
                channel,
                counter_mode::PX_START | counter_mode::PX_ZERO,
            ),
            "S626_CounterLoadTrigSet",
        );
    }

    /// Select a counter's interrupt sources.
    ///
    /// Replaces `S626_CounterIntSourceSet()`. On the 826, interrupts follow
    /// snapshot capture, so the adapter emits a diagnostic and installs one
    /// representative trigger set (overflow/underflow and index rise);
    /// callers wanting different events should configure snapshot triggers
    /// directly. Legacy shape is void, so a failing best-effort write is
    /// logged, not returned.
    pub fn counter_int_source_set(&self, board: u8, channel: u8, _int_src: u16) {
        if self.check_counter(board, channel).is_err() {
            return;
        }
        self.notify(
            "S626_CounterIntSourceSet() has no 826 equivalent; snapshots generate \
             the interrupts -- see S826_CounterSnapshotConfigWrite()",
        );
        log_best_effort(
            self.driver.counter_snapshot_config_write(
                board,
                channel,
                SnapshotTriggers::ZERO | SnapshotTriggers::IX_RISE,
                WriteMode::Write,
            ),
            "S626_CounterIntSourceSet",
        );
    }

    fn check_counter(&self, board: u8, channel: u8) -> Result<()> {
        self.check_board(board)?;
        if channel >= COUNTER_CHANNELS {
            return Err(CompatError::InvalidChannel {
                channel: u16::from(channel),
                max: u16::from(COUNTER_CHANNELS - 1),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_enable_codes() {
        assert_eq!(CounterEnable::try_from(0).unwrap(), CounterEnable::Always);
        assert_eq!(
            CounterEnable::try_from(1).unwrap(),
            CounterEnable::WhileIndex
        );
        assert!(CounterEnable::try_from(2).is_err());
    }

    #[test]
    fn test_legacy_latch_source_codes() {
        assert_eq!(LatchSource::try_from(0).unwrap(), LatchSource::OnRead);
        assert_eq!(LatchSource::try_from(3).unwrap(), LatchSource::BOnOverflowA);
        assert!(LatchSource::try_from(4).is_err());
    }
}
