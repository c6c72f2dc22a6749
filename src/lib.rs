//! Source-level migration layer from the Sensoray 626 API to the 826.
//!
//! The 626 and 826 are both 48-channel DIO / 16-channel ADC / counter
//! boards, but their driver APIs share almost nothing: register layouts,
//! data formats, timing models and the interrupt story all changed. This
//! crate gives ported 626 application code a family of adapters with the
//! legacy call shapes, implemented on top of an 826-style driver, so a port
//! can proceed one call site at a time.
//!
//! Porting a 626 application:
//!
//! 1. Open a [`Session`] where the code called `S626_DLLOpen()`; the
//!    session replaces every global the old API kept behind the scenes.
//! 2. Replace each `S626_*` call with the matching session adapter (the
//!    adapter docs name the legacy entry point they replace).
//! 3. Calls with no 826 behavior go through [`Session::unsupported`]; the
//!    returned [`Outcome`] tag and the emitted diagnostics show what still
//!    needs a real rework.
//! 4. Route diagnostics where the port can see them with a custom
//!    [`Reporter`]; the default logs through `tracing`.
//!
//! ```
//! use s626_compat::{DioGroup, PollEntry, PollRange, Session};
//! use s626_compat::hal::mock::MockBoard;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut session = Session::open(MockBoard::new())?;
//!
//! // S626_DIOWriteBankSet(0, 1, 0xBEEF);
//! session.dio_write_bank_set(0, DioGroup::G1, 0xBEEF)?;
//! assert_eq!(session.dio_write_bank_get(0, DioGroup::G1)?, 0xBEEF);
//!
//! // S626_ResetADC(0, poll_list); S626_ReadADC(0, databuf);
//! let poll_list = [
//!     PollEntry::new(0, PollRange::Bipolar10V),
//!     PollEntry::new(3, PollRange::Bipolar5V).last(),
//! ];
//! session.reset_adc(0, &poll_list)?;
//! let samples = session.read_adc(0)?;
//! assert_eq!(samples.len(), 16);
//! # Ok(())
//! # }
//! ```
//!
//! Adapters return [`Result`] instead of the legacy integer statuses;
//! [`CompatError::legacy_code`] recovers the numeric contract where ported
//! code still branches on it. All adapters are synchronous, matching both
//! APIs; blocking calls block the calling thread.

pub mod error;
pub mod hal;
pub mod report;
pub mod session;
pub mod subsystem;
pub mod timing;
pub mod unsupported;

pub use error::{CompatError, ErrorKind, Result};
pub use report::{LogReporter, MemoryReporter, Reporter};
pub use session::{InterruptCallback, Session};
pub use subsystem::analog_input::{PollEntry, PollRange};
pub use subsystem::counter::{CounterEnable, LatchSource};
pub use subsystem::digital_io::DioGroup;
pub use timing::WatchdogPeriod;
pub use unsupported::{Outcome, UnsupportedOp};
