//! Watchdog period translation and counter adapters against the simulated
//! board.

use s626_compat::hal::mock::{MockBoard, MockCall};
use s626_compat::hal::{counter_mode, CounterSnapshot, SnapshotTriggers, WriteMode};
use s626_compat::{
    CompatError, CounterEnable, ErrorKind, LatchSource, MemoryReporter, Session, WatchdogPeriod,
};

fn session_with_reporter() -> (Session<MockBoard>, MockBoard, MemoryReporter) {
    let mock = MockBoard::new();
    let handle = mock.clone();
    let reporter = MemoryReporter::new();
    let session = Session::open_with_reporter(mock, Box::new(reporter.clone())).unwrap();
    (session, handle, reporter)
}

#[test]
fn test_watchdog_period_round_trips_except_ten_seconds() {
    let session = Session::open(MockBoard::new()).unwrap();

    for period in [
        WatchdogPeriod::Ms125,
        WatchdogPeriod::Ms500,
        WatchdogPeriod::S1,
    ] {
        session.watchdog_period_set(0, period).unwrap();
        assert_eq!(session.watchdog_period_get(0).unwrap(), period);
    }

    session.watchdog_period_set(0, WatchdogPeriod::S10).unwrap();
    assert_eq!(
        session.watchdog_period_get(0),
        Err(CompatError::UnknownPeriod { ms: 10_000 })
    );
}

#[test]
fn test_watchdog_timeout_polling_and_kick() {
    let (session, handle, _reporter) = session_with_reporter();

    session
        .watchdog_period_set(0, WatchdogPeriod::Ms125)
        .unwrap();
    session.watchdog_enable_set(0, true).unwrap();
    assert!(session.watchdog_enable_get(0).unwrap());

    assert!(!session.watchdog_timeout(0).unwrap());
    handle.advance_ms(200);
    assert!(session.watchdog_timeout(0).unwrap());

    // A kick restarts the interval and carries the protection key.
    session.watchdog_reset(0).unwrap();
    assert!(!session.watchdog_timeout(0).unwrap());
    assert!(handle.calls().iter().any(|c| matches!(
        c,
        MockCall::WatchdogKick {
            board: 0,
            key: 0x5A55_AA5A,
        }
    )));
}

#[test]
fn test_cancelled_watchdog_wait_is_distinct_from_both_outcomes() {
    let (session, handle, _reporter) = session_with_reporter();
    session
        .watchdog_period_set(0, WatchdogPeriod::Ms125)
        .unwrap();
    session.watchdog_enable_set(0, true).unwrap();

    handle.cancel_waits(true);
    assert_eq!(session.watchdog_timeout(0), Err(CompatError::Cancelled));
}

#[test]
fn test_counter_soft_index_then_latch_read() {
    let (session, _handle, reporter) = session_with_reporter();

    session.counter_soft_index(0, 2).unwrap();
    assert_eq!(session.counter_read_latch(0, 2).unwrap(), 0);

    // The FIFO is drained: the next read legitimately has no data.
    let err = session.counter_read_latch(0, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReady);
    // Each latch read notes the emulation.
    assert_eq!(
        reporter
            .messages()
            .iter()
            .filter(|m| m.contains("S626_CounterReadLatch"))
            .count(),
        2
    );
}

#[test]
fn test_counter_latch_read_returns_pushed_counts() {
    let (session, handle, _reporter) = session_with_reporter();
    handle.push_snapshot(
        4,
        CounterSnapshot {
            counts: 0x00AB_CDEF,
            timestamp: 7,
            reason: SnapshotTriggers::IX_RISE,
        },
    );
    assert_eq!(session.counter_read_latch(0, 4).unwrap(), 0x00AB_CDEF);
}

#[test]
fn test_counter_preload_writes_register_zero() {
    let (session, handle, _reporter) = session_with_reporter();
    session.counter_preload(0, 1, 123_456).unwrap();
    assert_eq!(handle.preload(1, 0), 123_456);
}

#[test]
fn test_counter_enable_rewrites_only_the_trigger_fields() {
    let (session, handle, reporter) = session_with_reporter();

    // Unrelated mode bits survive the read-modify-write.
    let garbage = 0x000F | counter_mode::TE_IX_RISE | counter_mode::TD_IX_FALL;
    handle.seed_counter_mode(3, garbage);

    session.counter_enable_set(0, 3, CounterEnable::Always).unwrap();
    assert_eq!(handle.counter_mode(3), 0x000F | counter_mode::TE_STARTUP);
    assert!(reporter.is_empty());

    session
        .counter_enable_set(0, 3, CounterEnable::WhileIndex)
        .unwrap();
    assert_eq!(
        handle.counter_mode(3),
        0x000F | counter_mode::TE_IX_RISE | counter_mode::TD_IX_FALL
    );
    assert_eq!(reporter.len(), 1);
    assert!(reporter.messages()[0].contains("index polarity"));
}

#[test]
fn test_latch_source_on_read_clears_snapshot_triggers() {
    let (session, handle, reporter) = session_with_reporter();
    session
        .counter_latch_source_set(0, 0, LatchSource::AOnIndexA)
        .unwrap();
    assert_eq!(handle.snapshot_triggers(0), SnapshotTriggers::IX_RISE);
    assert_eq!(reporter.len(), 1);

    session
        .counter_latch_source_set(0, 0, LatchSource::OnRead)
        .unwrap();
    assert_eq!(handle.snapshot_triggers(0), SnapshotTriggers::empty());
}

#[test]
fn test_cross_counter_latch_sources_fail_without_device_calls() {
    let (session, handle, reporter) = session_with_reporter();
    handle.clear_calls();

    for source in [LatchSource::BOnIndexB, LatchSource::BOnOverflowA] {
        let err = session.counter_latch_source_set(0, 0, source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    assert!(handle.calls().is_empty());
    assert_eq!(reporter.len(), 2);
}

#[test]
fn test_load_trig_and_int_source_are_best_effort() {
    let (session, handle, reporter) = session_with_reporter();
    handle.clear_calls();

    session.counter_load_trig_set(0, 5, 2);
    assert_eq!(
        handle.counter_mode(5),
        counter_mode::PX_START | counter_mode::PX_ZERO
    );

    session.counter_int_source_set(0, 5, 1);
    assert_eq!(
        handle.snapshot_triggers(5),
        SnapshotTriggers::ZERO | SnapshotTriggers::IX_RISE
    );

    assert_eq!(reporter.len(), 2);
    assert!(handle.calls().iter().any(|c| matches!(
        c,
        MockCall::CounterSnapshotConfig {
            mode: WriteMode::Write,
            ..
        }
    )));
}

#[test]
fn test_counter_channel_validation() {
    let (session, handle, _reporter) = session_with_reporter();
    handle.clear_calls();

    assert_eq!(
        session.counter_preload(0, 6, 1),
        Err(CompatError::InvalidChannel { channel: 6, max: 5 })
    );
    assert!(handle.calls().is_empty());
}
