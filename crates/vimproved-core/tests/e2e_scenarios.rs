// Vimproved End-to-End Scenarios
//
// These tests drive the complete filter:
// encoded byte stream -> EventReader -> Interceptor -> EventWriter
//
// Run with: cargo test --test e2e_scenarios

use vimproved_core::config::Config;
use vimproved_core::stream::{decode_event, encode_event, StreamError, EVENT_SIZE};
use vimproved_core::{run_filter, Direction, Event, EventKind, Interceptor, Key};

const CAPSLOCK: Key = Key(58);
const ESC: Key = Key(1);
const LEFT_CTRL: Key = Key(29);
const ENTER: Key = Key(28);
const RIGHT_CTRL: Key = Key(97);
const SPACE: Key = Key(57);
const H: Key = Key(35);
const J: Key = Key(36);
const LEFT: Key = Key(105);
const DOWN: Key = Key(108);
const A: Key = Key(30);

fn encode_stream(events: &[Event]) -> Vec<u8> {
    events.iter().flat_map(encode_event).collect()
}

fn decode_stream(bytes: &[u8]) -> Vec<Event> {
    assert_eq!(bytes.len() % EVENT_SIZE, 0);
    bytes
        .chunks_exact(EVENT_SIZE)
        .map(|chunk| decode_event(chunk.try_into().unwrap()))
        .collect()
}

/// Run the input sequence through a fresh default-configured filter
fn filter(events: &[Event]) -> Vec<Event> {
    let mut interceptor = Interceptor::new(Config::default().into_specs());
    let mut out = Vec::new();
    run_filter(&mut interceptor, encode_stream(events).as_slice(), &mut out).unwrap();
    decode_stream(&out)
}

#[test]
fn test_tap_purity() {
    assert_eq!(
        filter(&[Event::key_down(CAPSLOCK), Event::key_up(CAPSLOCK)]),
        vec![Event::key_down(ESC), Event::syn(), Event::key_up(ESC)]
    );
    assert_eq!(
        filter(&[Event::key_down(ENTER), Event::key_up(ENTER)]),
        vec![Event::key_down(ENTER), Event::syn(), Event::key_up(ENTER)]
    );
    assert_eq!(
        filter(&[Event::key_down(SPACE), Event::key_up(SPACE)]),
        vec![Event::key_down(SPACE), Event::syn(), Event::key_up(SPACE)]
    );
}

#[test]
fn test_modifier_composition() {
    let output = filter(&[
        Event::key_down(CAPSLOCK),
        Event::key_down(A),
        Event::key_up(A),
        Event::key_up(CAPSLOCK),
    ]);
    assert_eq!(
        output,
        vec![
            Event::key_down(LEFT_CTRL),
            Event::syn(),
            Event::key_down(A),
            Event::key_up(A),
            Event::key_up(LEFT_CTRL),
        ]
    );
}

#[test]
fn test_layer_remap_release_order_independence() {
    let output = filter(&[
        Event::key_down(SPACE),
        Event::key_down(H),
        Event::key_down(J),
        Event::key_up(H),
        Event::key_up(J),
        Event::key_up(SPACE),
    ]);
    assert_eq!(
        output,
        vec![
            Event::key_down(LEFT),
            Event::key_down(DOWN),
            Event::key_up(LEFT),
            Event::key_up(DOWN),
        ]
    );
    // No space key ever reaches the output.
    assert!(output.iter().all(|e| e.code != SPACE.code()));
}

#[test]
fn test_forced_release() {
    let output = filter(&[
        Event::key_down(SPACE),
        Event::key_down(H),
        Event::key_up(SPACE),
    ]);
    assert_eq!(
        output,
        vec![Event::key_down(LEFT), Event::key_up(LEFT), Event::syn()]
    );
}

#[test]
fn test_pass_through_invariance() {
    // Unrelated keys, hardware syncs and non-key events come out identical
    // and in their original positions.
    let events = [
        Event::key_down(A),
        Event::syn(),
        Event {
            kind: EventKind::Other(0x02), // EV_REL
            code: 1,
            value: -3,
        },
        Event::key(A, Direction::Repeat),
        Event::key_up(A),
        Event::syn(),
    ];
    assert_eq!(filter(&events), events.to_vec());
}

#[test]
fn test_scan_codes_are_dropped() {
    let scan = Event {
        kind: EventKind::Msc,
        code: 0x04, // MSC_SCAN
        value: 0x1e,
    };
    let output = filter(&[scan, Event::key_down(A), Event::key_up(A)]);
    assert_eq!(output, vec![Event::key_down(A), Event::key_up(A)]);
}

#[test]
fn test_idempotent_restart() {
    // Splitting the physical stream at a point where all intercept keys are
    // released and restarting with a fresh filter must not change the
    // combined output.
    let first = [
        Event::key_down(CAPSLOCK),
        Event::key_down(A),
        Event::key_up(A),
        Event::key_up(CAPSLOCK),
    ];
    let second = [
        Event::key_down(SPACE),
        Event::key_down(H),
        Event::key_up(H),
        Event::key_up(SPACE),
    ];

    let continuous: Vec<Event> = first.iter().chain(second.iter()).copied().collect();
    let mut restarted = filter(&first);
    restarted.extend(filter(&second));

    assert_eq!(filter(&continuous), restarted);
}

#[test]
fn test_modifier_engages_layer_chain() {
    // Holding caps (modifier) and space (layer) together: the modifier down
    // lands before the remapped key.
    let output = filter(&[
        Event::key_down(CAPSLOCK),
        Event::key_down(SPACE),
        Event::key_down(H),
        Event::key_up(H),
        Event::key_up(SPACE),
        Event::key_up(CAPSLOCK),
    ]);
    assert_eq!(
        output,
        vec![
            Event::key_down(LEFT_CTRL),
            Event::syn(),
            Event::key_down(LEFT),
            Event::key_up(LEFT),
            Event::key_up(LEFT_CTRL),
        ]
    );
}

#[test]
fn test_stacked_modifiers() {
    let output = filter(&[
        Event::key_down(CAPSLOCK),
        Event::key_down(ENTER),
        Event::key_down(A),
        Event::key_up(A),
        Event::key_up(ENTER),
        Event::key_up(CAPSLOCK),
    ]);
    assert_eq!(
        output,
        vec![
            Event::key_down(LEFT_CTRL),
            Event::syn(),
            Event::key_down(RIGHT_CTRL),
            Event::syn(),
            Event::key_down(A),
            Event::key_up(A),
            Event::key_up(RIGHT_CTRL),
            Event::key_up(LEFT_CTRL),
        ]
    );
}

#[test]
fn test_truncated_input_ends_stream_cleanly() {
    let mut bytes = encode_stream(&[Event::key_down(A), Event::key_up(A)]);
    bytes.truncate(bytes.len() - 5); // torn trailing record
    let mut interceptor = Interceptor::new(Config::default().into_specs());
    let mut out = Vec::new();
    run_filter(&mut interceptor, bytes.as_slice(), &mut out).unwrap();
    assert_eq!(decode_stream(&out), vec![Event::key_down(A)]);
}

/// Writer that fails on the first write
struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_is_fatal() {
    let bytes = encode_stream(&[Event::key_down(A)]);
    let mut interceptor = Interceptor::new(Config::default().into_specs());
    let result = run_filter(&mut interceptor, bytes.as_slice(), BrokenPipe);
    assert!(matches!(result, Err(StreamError::Write(_))));
}
