//! Dispatch of legacy calls with no 826 behavior, and session lifecycle.

use s626_compat::hal::mock::{MockBoard, MockCall};
use s626_compat::{CompatError, MemoryReporter, Outcome, Session, UnsupportedOp};

#[test]
fn test_every_unsupported_op_reports_once_and_touches_no_hardware() {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let reporter = MemoryReporter::new();
    let session = Session::open_with_reporter(mock, Box::new(reporter.clone())).unwrap();
    handle.clear_calls();

    for op in UnsupportedOp::ALL {
        reporter.clear();

        let outcome = session.unsupported(op);
        assert_eq!(outcome, Outcome::Unsupported(op.name()));
        assert_eq!(outcome.value_or(0), 0);

        let messages = reporter.messages();
        assert_eq!(messages.len(), 1, "{}", op.name());
        assert!(messages[0].contains(op.name()), "{}", messages[0]);
        assert!(messages[0].contains("no 826 equivalent"), "{}", messages[0]);
        assert!(messages[0].contains(op.hint()), "{}", messages[0]);
    }

    assert!(handle.calls().is_empty());
}

#[test]
fn test_interrupt_callback_is_rejected_with_a_diagnostic() {
    fn callback(_board: u8) {}

    let mock = MockBoard::new();
    let handle = mock.clone();
    let reporter = MemoryReporter::new();
    let session = Session::open_with_reporter(mock, Box::new(reporter.clone())).unwrap();
    handle.clear_calls();

    let err = session.open_board(0, Some(callback)).unwrap_err();
    assert_eq!(err, CompatError::CallbacksUnsupported);
    assert_eq!(reporter.len(), 1);
    assert!(reporter.messages()[0].contains("blocking calls"));
    assert!(handle.calls().is_empty());

    // Without a callback the same board opens fine.
    session.open_board(0, None).unwrap();
}

#[test]
fn test_session_lifecycle_matches_legacy_open_close() {
    let mock = MockBoard::with_boards(0b11);
    let handle = mock.clone();
    let session = Session::open(mock).unwrap();

    assert_eq!(session.detected_boards(), 0b11);
    assert_eq!(session.board_address(1), 1);
    assert!(session.api_version(0) != 0);

    // Closing a board is a no-op; closing the session releases the driver.
    session.close_board(1);
    session.close();
    assert_eq!(
        handle
            .calls()
            .iter()
            .filter(|c| matches!(c, MockCall::SystemClose))
            .count(),
        1
    );
}
