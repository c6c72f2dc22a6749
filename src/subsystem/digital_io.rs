//! Digital I/O: legacy 16-bit groups over the 826's two-word layout.
//!
//! The 626 addresses its 48 DIO channels as three 16-bit groups; the 826
//! addresses the same channels as two 24-bit words:
//!
//! ```text
//! 626: (47:40, 39:32)(31:24, 23:16)(15:8, 7:0) = (group2)(group1)(group0)
//! 826: (47:40, 39:32, 31:24)(23:16, 15:8, 7:0) = (word1)(word0)
//! ```
//!
//! Group 1 straddles the word boundary: its low byte lives in word 0 bits
//! 23:16 and its high byte in word 1 bits 7:0. The codec here is total and
//! bit-exact in both directions; the bank adapters compose it with bulk
//! driver reads and writes.

use crate::error::{CompatError, Result};
use crate::hal::{DioState, S826Driver, WriteMode};
use crate::session::Session;

/// One of the three legacy 16-bit DIO groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DioGroup {
    /// Channels 0-15.
    G0,
    /// Channels 16-31.
    G1,
    /// Channels 32-47.
    G2,
}

impl TryFrom<u16> for DioGroup {
    type Error = CompatError;

    fn try_from(group: u16) -> Result<Self> {
        match group {
            0 => Ok(Self::G0),
            1 => Ok(Self::G1),
            2 => Ok(Self::G2),
            _ => Err(CompatError::InvalidGroup { group }),
        }
    }
}

impl DioState {
    /// Extract one legacy 16-bit group from the two-word layout.
    pub fn group(&self, group: DioGroup) -> u16 {
        let [w0, w1] = self.words();
        match group {
            DioGroup::G0 => (w0 & 0xFFFF) as u16,
            DioGroup::G1 => (((w0 >> 16) & 0xFF) | ((w1 & 0xFF) << 8)) as u16,
            DioGroup::G2 => ((w1 >> 8) & 0xFFFF) as u16,
        }
    }

    /// Insert one legacy 16-bit group into the two-word layout.
    ///
    /// Bits belonging to the other groups are left untouched, and
    /// extracting the same group afterwards returns `value` exactly.
    pub fn set_group(&mut self, group: DioGroup, value: u16) {
        let [w0, w1] = self.words();
        let value = u32::from(value);
        match group {
            DioGroup::G0 => {
                self.set_word(0, (w0 & 0x00FF_0000) | value);
            }
            DioGroup::G1 => {
                self.set_word(0, (w0 & 0x0000_FFFF) | ((value & 0xFF) << 16));
                self.set_word(1, (w1 & 0x00FF_FF00) | (value >> 8));
            }
            DioGroup::G2 => {
                self.set_word(1, (w1 & 0x0000_00FF) | (value << 8));
            }
        }
    }
}

impl<D: S826Driver> Session<D> {
    /// Read back the programmed output states of one group.
    ///
    /// Replaces `S626_DIOWriteBankGet()`.
    pub fn dio_write_bank_get(&self, board: u8, group: DioGroup) -> Result<u16> {
        self.check_board(board)?;
        let state = self.driver.dio_output_read(board)?;
        Ok(state.group(group))
    }

    /// Read the physical input states of one group.
    ///
    /// Replaces `S626_DIOReadBank()`.
    pub fn dio_read_bank(&self, board: u8, group: DioGroup) -> Result<u16> {
        self.check_board(board)?;
        let state = self.driver.dio_input_read(board)?;
        Ok(state.group(group))
    }

    /// Program the output states of one group.
    ///
    /// Replaces `S626_DIOWriteBankSet()`. The write is issued as two
    /// bit-masked driver calls (set the 1s, then clear the 0s), which never
    /// disturbs the other groups but is not atomic across the group: a
    /// concurrent reader can observe the newly-set bits before the cleared
    /// bits drop. Callers that need the whole group to change indivisibly
    /// should use [`dio_write_bank_set_atomic`](Self::dio_write_bank_set_atomic).
    pub fn dio_write_bank_set(&self, board: u8, group: DioGroup, data: u16) -> Result<()> {
        self.check_board(board)?;

        let mut set = DioState::new();
        set.set_group(group, data);
        let mut clear = DioState::new();
        clear.set_group(group, !data);

        self.driver.dio_output_write(board, set, WriteMode::Set)?;
        self.driver.dio_output_write(board, clear, WriteMode::Clear)?;
        Ok(())
    }

    /// Program the output states of one group in a single full-width write.
    ///
    /// Reads the current 48-channel output state, replaces the group, and
    /// writes everything back. The group changes indivisibly, but the
    /// read-modify-write races with any concurrent writer of the *other*
    /// groups; serialize externally if both properties are needed at once.
    pub fn dio_write_bank_set_atomic(&self, board: u8, group: DioGroup, data: u16) -> Result<()> {
        self.check_board(board)?;
        let mut state = self.driver.dio_output_read(board)?;
        state.set_group(group, data);
        self.driver.dio_output_write(board, state, WriteMode::Write)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_group_mapping_is_bit_exact() {
        // Group 1 straddles the word boundary.
        let mut state = DioState::new();
        state.set_group(DioGroup::G1, 0xABCD);
        assert_eq!(state.words(), [0x00CD_0000, 0x0000_00AB]);

        let mut state = DioState::new();
        state.set_group(DioGroup::G0, 0x1234);
        assert_eq!(state.words(), [0x0000_1234, 0]);

        let mut state = DioState::new();
        state.set_group(DioGroup::G2, 0x5678);
        assert_eq!(state.words(), [0, 0x0056_7800]);
    }

    #[test]
    fn test_insert_then_extract_is_identity() {
        for group in [DioGroup::G0, DioGroup::G1, DioGroup::G2] {
            for value in [0u16, 1, 0x00FF, 0xFF00, 0xA5A5, 0xFFFF] {
                let mut state = DioState::from_words([0x00DE_ADBE, 0x00EF_1234]);
                state.set_group(group, value);
                assert_eq!(state.group(group), value, "group {group:?} value {value:#06x}");
            }
        }
    }

    #[test]
    fn test_insert_does_not_disturb_other_groups() {
        let mut state = DioState::from_words([0x00AA_5555, 0x0055_AAAA]);
        let before_g0 = state.group(DioGroup::G0);
        let before_g2 = state.group(DioGroup::G2);

        state.set_group(DioGroup::G1, 0x0F0F);

        assert_eq!(state.group(DioGroup::G0), before_g0);
        assert_eq!(state.group(DioGroup::G2), before_g2);
        assert_eq!(state.group(DioGroup::G1), 0x0F0F);
    }

    #[test]
    fn test_groups_cover_all_48_bits_exactly_once() {
        let mut state = DioState::new();
        state.set_group(DioGroup::G0, 0xFFFF);
        state.set_group(DioGroup::G1, 0xFFFF);
        state.set_group(DioGroup::G2, 0xFFFF);
        assert_eq!(state.words(), [DioState::WORD_MASK, DioState::WORD_MASK]);
    }

    #[test]
    fn test_invalid_group_index() {
        let err = DioGroup::try_from(3).unwrap_err();
        assert_eq!(err, CompatError::InvalidGroup { group: 3 });
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
