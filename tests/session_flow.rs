//! End-to-end flow without a terminal: replay transport → session → report.

use serlog::model::LogLine;
use serlog::session::Session;
use serlog::source::{EventHub, ReplayTransport};
use std::io::Cursor;
use std::time::{Duration, Instant};

/// Pump until the replay has finished or the deadline passes.
fn pump_until_disconnected(session: &mut Session) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        session.pump();
        let done = session
            .buffer()
            .lines()
            .last()
            .is_some_and(|line| line.body() == "Disconnected");
        if done {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("replay did not finish in time");
}

fn replay(bytes: &'static [u8], timestamps: bool) -> Session {
    let hub = EventHub::new();
    let subscription = hub.subscribe();
    let transport = ReplayTransport::from_reader("capture", Cursor::new(bytes), &hub).unwrap();
    let mut session = Session::new(Box::new(transport), subscription, timestamps);
    pump_until_disconnected(&mut session);
    session
}

#[test]
fn replayed_capture_yields_report() {
    let session = replay(b"boot ok\n<START_REPORT>\nA\nB\n<END_REPORT>\n", false);

    assert_eq!(session.report(), Ok("A\nB\n".to_string()));
    assert!(!session.is_connected());
}

#[test]
fn replay_is_announced_and_closed() {
    let session = replay(b"x\n", false);
    let texts: Vec<String> = session.buffer().lines().iter().map(LogLine::text).collect();

    assert_eq!(texts.first().map(String::as_str), Some("Connected Devices:"));
    assert_eq!(texts.get(1).map(String::as_str), Some("- capture"));
    assert!(texts.contains(&"x".to_string()));
    assert_eq!(texts.last().map(String::as_str), Some("Disconnected"));
}

#[test]
fn unterminated_tail_is_flushed_on_disconnect() {
    let session = replay(b"first\nlast words", false);
    let texts: Vec<String> = session.buffer().lines().iter().map(LogLine::text).collect();

    assert!(texts.contains(&"last words".to_string()));
    assert_eq!(session.pending(), "");
}

#[test]
fn stamped_replay_exports_clean_full_log() {
    let session = replay(b"alpha\nbeta\n", true);
    let full = session.full_log();

    assert!(full.contains("alpha\nbeta\n"), "unexpected full log {:?}", full);
}

#[test]
fn replay_cannot_be_written_to() {
    let mut session = replay(b"", false);
    assert!(session.send("1").is_err());
}
