//! Analog output: legacy-scaled DAC writes.
//!
//! The 626 programs its DACs with a signed setpoint in [-8191, +8191]
//! mapped over a ±10 V span; the 826 takes an unsigned 16-bit code over a
//! selectable span. The adapter rescales the setpoint linearly onto the
//! full 16-bit range and pins the output span to ±10 V, so ported code
//! produces the same voltages it did on the 626.

use crate::error::{CompatError, Result};
use crate::hal::{DacRange, S826Driver};
use crate::session::Session;

/// Lowest legal legacy setpoint (-10 V).
pub const DAC_SETPOINT_MIN: i32 = -8191;

/// Highest legal legacy setpoint (+10 V).
pub const DAC_SETPOINT_MAX: i32 = 8191;

/// Number of DAC channels per board.
pub const DAC_CHANNELS: u16 = 4;

/// Rescale a legacy setpoint to the 826's unsigned 16-bit output code.
///
/// -8191 maps to 0, 0 to 32767 and +8191 to 65535; the intermediate values
/// follow the host's default float-to-integer conversion (truncation), as
/// the original migration aid did. Out-of-range setpoints are rejected.
pub fn setpoint_to_code(setpoint: i32) -> Result<u16> {
    if !(DAC_SETPOINT_MIN..=DAC_SETPOINT_MAX).contains(&setpoint) {
        return Err(CompatError::InvalidSetpoint { setpoint });
    }
    Ok((f64::from(setpoint + 8191) * 65535.0 / 16382.0) as u16)
}

impl<D: S826Driver> Session<D> {
    /// Program one DAC channel with a legacy setpoint.
    ///
    /// Replaces `S626_WriteDAC()`. Channel and setpoint are validated
    /// before any driver call; on valid input the ±10 V span is selected
    /// and the rescaled code written.
    pub fn write_dac(&self, board: u8, channel: u16, setpoint: i32) -> Result<()> {
        self.check_board(board)?;
        if channel >= DAC_CHANNELS {
            return Err(CompatError::InvalidChannel {
                channel,
                max: DAC_CHANNELS - 1,
            });
        }
        let code = setpoint_to_code(setpoint)?;

        self.driver
            .dac_range_write(board, channel as u8, DacRange::Bipolar10V)?;
        self.driver.dac_data_write(board, channel as u8, code)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(setpoint_to_code(DAC_SETPOINT_MIN).unwrap(), 0);
        assert_eq!(setpoint_to_code(DAC_SETPOINT_MAX).unwrap(), 65535);
        // Midpoint lands on 32767.5 and truncates.
        assert_eq!(setpoint_to_code(0).unwrap(), 32767);
    }

    #[test]
    fn test_scale_is_monotonic_at_unit_steps() {
        let mut previous = setpoint_to_code(DAC_SETPOINT_MIN).unwrap();
        for setpoint in (DAC_SETPOINT_MIN + 1)..=DAC_SETPOINT_MAX {
            let code = setpoint_to_code(setpoint).unwrap();
            assert!(code >= previous, "regression at setpoint {setpoint}");
            previous = code;
        }
    }

    #[test]
    fn test_out_of_range_setpoints_rejected() {
        assert_eq!(
            setpoint_to_code(8192),
            Err(CompatError::InvalidSetpoint { setpoint: 8192 })
        );
        assert_eq!(
            setpoint_to_code(-8192),
            Err(CompatError::InvalidSetpoint { setpoint: -8192 })
        );
    }
}
