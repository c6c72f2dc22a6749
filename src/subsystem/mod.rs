//! Legacy-shaped adapters, one module per 626 subsystem.
//!
//! Every adapter is a method on [`crate::Session`]: it validates its
//! arguments, translates them through the codecs in this crate, issues one
//! or more driver calls, and maps the result back into the legacy contract.
//! Composite adapters short-circuit on the first failing driver call and
//! propagate its code unchanged; already-issued side effects are not rolled
//! back, matching the original migration aid.
//!
//! - [`analog_input`] - poll-list translation, burst trigger, blocking read
//! - [`analog_output`] - legacy-scaled DAC writes
//! - [`digital_io`] - 16-bit group codec and bank read/write
//! - [`counter`] - soft index, preload, latch emulation, enable gating
//! - [`watchdog`] - enumerated periods, enable, kick, timeout polling

pub mod analog_input;
pub mod analog_output;
pub mod counter;
pub mod digital_io;
pub mod watchdog;
