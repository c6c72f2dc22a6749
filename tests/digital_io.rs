//! Legacy DIO bank adapters against the simulated board.

use s626_compat::hal::mock::{MockBoard, MockCall};
use s626_compat::hal::{DioState, WriteMode};
use s626_compat::{DioGroup, Session};

const GROUPS: [DioGroup; 3] = [DioGroup::G0, DioGroup::G1, DioGroup::G2];

#[test]
fn test_bank_set_then_get_round_trips_every_group() {
    let mock = MockBoard::new();
    let session = Session::open(mock).unwrap();

    for group in GROUPS {
        session.dio_write_bank_set(0, group, 0xBEEF).unwrap();
        assert_eq!(session.dio_write_bank_get(0, group).unwrap(), 0xBEEF);
    }
}

#[test]
fn test_bank_set_issues_set_then_clear_with_exact_masks() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let session = Session::open(mock).unwrap();
    handle.clear_calls();

    // Group 1 straddles the 826 word boundary, which makes it the
    // interesting case for the translated masks.
    session.dio_write_bank_set(0, DioGroup::G1, 0xBEEF).unwrap();

    let mut expected_set = DioState::new();
    expected_set.set_group(DioGroup::G1, 0xBEEF);
    let mut expected_clear = DioState::new();
    expected_clear.set_group(DioGroup::G1, !0xBEEF);

    assert_eq!(
        handle.calls(),
        vec![
            MockCall::DioOutputWrite {
                board: 0,
                state: expected_set,
                mode: WriteMode::Set,
            },
            MockCall::DioOutputWrite {
                board: 0,
                state: expected_clear,
                mode: WriteMode::Clear,
            },
        ]
    );
}

#[test]
fn test_atomic_bank_set_issues_one_full_width_write() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let session = Session::open(mock).unwrap();
    session.dio_write_bank_set(0, DioGroup::G0, 0x1234).unwrap();
    handle.clear_calls();

    session
        .dio_write_bank_set_atomic(0, DioGroup::G2, 0xCAFE)
        .unwrap();

    let calls = handle.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], MockCall::DioOutputRead { board: 0 });
    let mut expected = DioState::new();
    expected.set_group(DioGroup::G0, 0x1234);
    expected.set_group(DioGroup::G2, 0xCAFE);
    assert_eq!(
        calls[1],
        MockCall::DioOutputWrite {
            board: 0,
            state: expected,
            mode: WriteMode::Write,
        }
    );
    assert_eq!(session.dio_write_bank_get(0, DioGroup::G0).unwrap(), 0x1234);
    assert_eq!(session.dio_write_bank_get(0, DioGroup::G2).unwrap(), 0xCAFE);
}

#[test]
fn test_writing_one_group_leaves_the_others_alone() {
    let mock = MockBoard::new();
    let session = Session::open(mock).unwrap();

    session.dio_write_bank_set(0, DioGroup::G0, 0xAAAA).unwrap();
    session.dio_write_bank_set(0, DioGroup::G2, 0x5555).unwrap();
    session.dio_write_bank_set(0, DioGroup::G1, 0x0F0F).unwrap();

    assert_eq!(session.dio_write_bank_get(0, DioGroup::G0).unwrap(), 0xAAAA);
    assert_eq!(session.dio_write_bank_get(0, DioGroup::G1).unwrap(), 0x0F0F);
    assert_eq!(session.dio_write_bank_get(0, DioGroup::G2).unwrap(), 0x5555);
}

#[test]
fn test_read_bank_reflects_physical_inputs() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let session = Session::open(mock).unwrap();

    let mut inputs = DioState::new();
    inputs.set_group(DioGroup::G1, 0xD00D);
    handle.set_inputs(inputs);

    assert_eq!(session.dio_read_bank(0, DioGroup::G1).unwrap(), 0xD00D);
    assert_eq!(session.dio_read_bank(0, DioGroup::G0).unwrap(), 0);
    // The output latch is untouched by input reads.
    assert_eq!(session.dio_write_bank_get(0, DioGroup::G1).unwrap(), 0);
}

#[test]
fn test_undetected_board_makes_no_driver_call() {
    let mock = MockBoard::with_boards(0b1);
    let handle = mock.clone();
    let session = Session::open(mock).unwrap();
    handle.clear_calls();

    assert!(session.dio_write_bank_set(3, DioGroup::G0, 1).is_err());
    assert!(handle.calls().is_empty());
}
