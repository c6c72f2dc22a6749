//! Poll-list translation and DAC scaling against the simulated board.

use s626_compat::hal::mock::{MockBoard, MockCall};
use s626_compat::hal::{AdcGain, AdcTrigger, HalError, Timeout, WriteMode};
use s626_compat::subsystem::analog_input::ADC_SETTLE_US;
use s626_compat::{CompatError, PollEntry, PollRange, Session};

#[test]
fn test_reset_adc_programs_one_slot_per_entry_in_order() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let mut session = Session::open(mock).unwrap();
    handle.clear_calls();

    let poll_list = [
        PollEntry::new(0, PollRange::Bipolar10V),
        PollEntry::new(3, PollRange::Bipolar5V).last(),
    ];
    session.reset_adc(0, &poll_list).unwrap();

    assert_eq!(
        handle.calls(),
        vec![
            MockCall::AdcEnable {
                board: 0,
                enable: false,
            },
            MockCall::AdcSlotConfig {
                board: 0,
                slot: 0,
                channel: 0,
                settle_us: ADC_SETTLE_US,
                gain: AdcGain::X1,
            },
            MockCall::AdcSlotConfig {
                board: 0,
                slot: 1,
                channel: 3,
                settle_us: ADC_SETTLE_US,
                gain: AdcGain::X2,
            },
            MockCall::AdcSlotList {
                board: 0,
                slots: 0b11,
            },
            MockCall::AdcTrigMode {
                board: 0,
                trigger: AdcTrigger::VirtualDio(0),
            },
            MockCall::AdcEnable {
                board: 0,
                enable: true,
            },
        ]
    );
    assert_eq!(session.programmed_slots(0).unwrap(), 0b11);
}

#[test]
fn test_reset_adc_stops_at_the_end_marker() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let mut session = Session::open(mock).unwrap();

    // Entries past the marker are ignored, as the 626 hardware ignored them.
    let poll_list = [
        PollEntry::new(5, PollRange::Bipolar10V).last(),
        PollEntry::new(9, PollRange::Bipolar10V),
    ];
    session.reset_adc(0, &poll_list).unwrap();

    assert_eq!(session.programmed_slots(0).unwrap(), 0b1);
    assert!(handle.adc_slot(1).is_none());
}

#[test]
fn test_reset_adc_rejects_unterminated_list() {
    let mock = MockBoard::new();
    let mut session = Session::open(mock).unwrap();

    let poll_list = [
        PollEntry::new(0, PollRange::Bipolar10V),
        PollEntry::new(1, PollRange::Bipolar10V),
    ];
    assert_eq!(
        session.reset_adc(0, &poll_list),
        Err(CompatError::MissingEndOfList)
    );
}

#[test]
fn test_reset_adc_rejects_overlong_list() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let mut session = Session::open(mock).unwrap();

    let mut poll_list = vec![PollEntry::new(0, PollRange::Bipolar10V); 16];
    poll_list.push(PollEntry::new(1, PollRange::Bipolar10V).last());

    assert_eq!(
        session.reset_adc(0, &poll_list),
        Err(CompatError::PollListTooLong)
    );
    // The 16 legal slots were programmed before the overflow was noticed.
    assert!(handle.adc_slot(15).is_some());
}

#[test]
fn test_reset_adc_failure_aborts_without_rollback() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let mut session = Session::open(mock).unwrap();
    handle.clear_calls();

    // Call 0 is the disable, calls 1 and 2 the slot configs: fail the
    // second slot.
    handle.fail_nth_call(2, HalError::Code(-5));

    let poll_list = [
        PollEntry::new(0, PollRange::Bipolar10V),
        PollEntry::new(3, PollRange::Bipolar5V).last(),
    ];
    assert_eq!(
        session.reset_adc(0, &poll_list),
        Err(CompatError::Device { code: -5 })
    );

    // Slot 0 stays programmed and tracked; the slot list, trigger and
    // re-enable never happened.
    assert_eq!(session.programmed_slots(0).unwrap(), 0b1);
    assert!(handle.adc_slot(0).is_some());
    let calls = handle.calls();
    assert_eq!(calls.len(), 3);
    assert!(!calls
        .iter()
        .any(|c| matches!(c, MockCall::AdcSlotList { .. })));
}

#[test]
fn test_read_adc_pulses_the_trigger_and_blocks_for_samples() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let mut session = Session::open(mock).unwrap();

    let poll_list = [PollEntry::new(2, PollRange::Bipolar10V).last()];
    session.reset_adc(0, &poll_list).unwrap();

    let mut samples = [0i32; 16];
    samples[0] = 0x7FFF;
    samples[1] = 0x1_FFFF; // narrows to -1 in the 626 data format
    handle.set_samples(samples);
    handle.clear_calls();

    let data = session.read_adc(0).unwrap();
    assert_eq!(data[0], 0x7FFF);
    assert_eq!(data[1], -1);

    assert_eq!(
        handle.calls(),
        vec![
            MockCall::VirtualWrite {
                board: 0,
                mask: 0b1,
                mode: WriteMode::Set,
            },
            MockCall::VirtualWrite {
                board: 0,
                mask: 0b1,
                mode: WriteMode::Clear,
            },
            MockCall::AdcRead {
                board: 0,
                slots: 0b1,
                timeout: Timeout::Infinite,
            },
        ]
    );
}

#[test]
fn test_write_dac_selects_span_and_scales_endpoints() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let session = Session::open(mock).unwrap();

    session.write_dac(0, 0, -8191).unwrap();
    assert_eq!(handle.dac_value(0), Some(0));

    session.write_dac(0, 1, 0).unwrap();
    assert_eq!(handle.dac_value(1), Some(32767));

    session.write_dac(0, 2, 8191).unwrap();
    assert_eq!(handle.dac_value(2), Some(65535));

    for channel in 0..3 {
        assert_eq!(
            handle.dac_range(channel),
            Some(s626_compat::hal::DacRange::Bipolar10V)
        );
    }
}

#[test]
fn test_write_dac_validates_before_any_driver_call() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let session = Session::open(mock).unwrap();
    handle.clear_calls();

    assert_eq!(
        session.write_dac(0, 0, 8192),
        Err(CompatError::InvalidSetpoint { setpoint: 8192 })
    );
    assert_eq!(
        session.write_dac(0, 4, 0),
        Err(CompatError::InvalidChannel { channel: 4, max: 3 })
    );
    assert!(handle.calls().is_empty());
}
