// Vimproved Event Model
// Semantic view of one input_event record, timestamp stripped

use crate::Key;
use std::fmt;

/// EV_SYN event type code from input-event-codes.h
pub const EV_SYN: u16 = 0x00;
/// EV_KEY event type code
pub const EV_KEY: u16 = 0x01;
/// EV_MSC event type code
pub const EV_MSC: u16 = 0x04;
/// SYN_REPORT code for synchronization events
pub const SYN_REPORT: u16 = 0x00;
/// MSC_SCAN code for scan-code informational events
pub const MSC_SCAN: u16 = 0x04;

/// Key stroke direction, carried in the value field of EV_KEY events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Repeat,
}

impl Direction {
    /// Wire value for this direction
    pub fn value(self) -> i32 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Repeat => 2,
        }
    }

    /// Parse a wire value into a direction
    pub fn from_value(value: i32) -> Option<Direction> {
        match value {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Repeat),
            _ => None,
        }
    }
}

/// Event type discriminator.
///
/// Only key, sync and scan-code events carry meaning for the filter;
/// everything else is preserved verbatim through `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Sync,
    Key,
    Msc,
    Other(u16),
}

impl EventKind {
    /// Wire discriminator for this kind
    pub fn raw(self) -> u16 {
        match self {
            EventKind::Sync => EV_SYN,
            EventKind::Key => EV_KEY,
            EventKind::Msc => EV_MSC,
            EventKind::Other(raw) => raw,
        }
    }

    /// Classify a wire discriminator
    pub fn from_raw(raw: u16) -> EventKind {
        match raw {
            EV_SYN => EventKind::Sync,
            EV_KEY => EventKind::Key,
            EV_MSC => EventKind::Msc,
            other => EventKind::Other(other),
        }
    }
}

/// One input event with the hardware timestamp stripped.
///
/// Immutable value, copied freely. Equality is structural on
/// (kind, code, value); the timestamp never carried meaning and is
/// zeroed when the event is re-encoded for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl Event {
    /// Build a key event
    pub fn key(key: Key, direction: Direction) -> Event {
        Event {
            kind: EventKind::Key,
            code: key.code(),
            value: direction.value(),
        }
    }

    /// Build a key-down event
    pub fn key_down(key: Key) -> Event {
        Event::key(key, Direction::Down)
    }

    /// Build a key-up event
    pub fn key_up(key: Key) -> Event {
        Event::key(key, Direction::Up)
    }

    /// Build a synchronization report
    pub fn syn() -> Event {
        Event {
            kind: EventKind::Sync,
            code: SYN_REPORT,
            value: 0,
        }
    }

    /// True for EV_KEY events (keys and buttons)
    pub fn is_key(&self) -> bool {
        self.kind == EventKind::Key
    }

    /// True for MSC_SCAN informational events
    pub fn is_scan_code(&self) -> bool {
        self.kind == EventKind::Msc && self.code == MSC_SCAN
    }

    /// The key code of this event
    pub fn key_code(&self) -> Key {
        Key::from(self.code)
    }

    /// Stroke direction, for key events with a recognized value
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_value(self.value)
    }

    /// Copy of this event with the code replaced.
    ///
    /// Used to derive a modifier or remapped event from the incoming one,
    /// preserving its direction.
    pub fn with_code(&self, key: Key) -> Event {
        Event {
            code: key.code(),
            ..*self
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Key => match self.direction() {
                Some(Direction::Up) => write!(f, "{} up", self.key_code()),
                Some(Direction::Down) => write!(f, "{} down", self.key_code()),
                Some(Direction::Repeat) => write!(f, "{} repeat", self.key_code()),
                None => write!(f, "{} value {}", self.key_code(), self.value),
            },
            EventKind::Sync => write!(f, "syn"),
            EventKind::Msc => write!(f, "msc code {:#x}", self.code),
            EventKind::Other(raw) => write!(f, "ev {:#x} code {:#x}", raw, self.code),
        }
    }
}

/// Tap combo for a key: down, sync, up.
///
/// The sync after the down makes the consumer flush the press before the
/// release arrives, matching what real hardware produces.
pub fn tap_combo(key: Key) -> [Event; 3] {
    [Event::key_down(key), Event::syn(), Event::key_up(key)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trip() {
        assert_eq!(Direction::from_value(0), Some(Direction::Up));
        assert_eq!(Direction::from_value(1), Some(Direction::Down));
        assert_eq!(Direction::from_value(2), Some(Direction::Repeat));
        assert_eq!(Direction::from_value(3), None);
    }

    #[test]
    fn test_event_kind_preserves_unknown_discriminators() {
        assert_eq!(EventKind::from_raw(0x02), EventKind::Other(0x02)); // EV_REL
        assert_eq!(EventKind::from_raw(0x02).raw(), 0x02);
        assert_eq!(EventKind::from_raw(EV_KEY), EventKind::Key);
    }

    #[test]
    fn test_scan_code_detection() {
        let scan = Event {
            kind: EventKind::Msc,
            code: MSC_SCAN,
            value: 0x1c,
        };
        assert!(scan.is_scan_code());
        assert!(!Event::syn().is_scan_code());
        assert!(!Event::key_down(Key::from(30)).is_scan_code());
    }

    #[test]
    fn test_tap_combo_shape() {
        let combo = tap_combo(Key::from(1)); // ESC
        assert_eq!(combo[0], Event::key_down(Key::from(1)));
        assert_eq!(combo[1], Event::syn());
        assert_eq!(combo[2], Event::key_up(Key::from(1)));
    }

    #[test]
    fn test_with_code_keeps_direction() {
        let up = Event::key_up(Key::from(58)); // CAPSLOCK up
        let ctrl_up = up.with_code(Key::from(29));
        assert_eq!(ctrl_up.direction(), Some(Direction::Up));
        assert_eq!(ctrl_up.code, 29);
    }
}
