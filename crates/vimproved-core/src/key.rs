// Vimproved Key Type
// Represents a single key or button code from Linux input-event-codes.h

use std::fmt;
use std::sync::OnceLock;

/// Represents a single keyboard key or mouse button code.
///
/// Newtype wrapper around u16 for type safety. The numeric values match
/// Linux input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    /// Get the raw numeric code value
    pub fn code(self) -> u16 {
        self.0
    }

    /// Get the display name of this key
    pub fn name(self) -> &'static str {
        key_name(self.0)
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key(code)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Name/code pairs for every key the configuration surface understands.
///
/// Built once on first access and read-only afterwards; the state machines
/// never consult it, only the config loader and log formatting do.
fn name_table() -> &'static Vec<(&'static str, u16)> {
    static NAME_TO_CODE: OnceLock<Vec<(&'static str, u16)>> = OnceLock::new();
    NAME_TO_CODE.get_or_init(|| {
        vec![
            ("ESC", 1),
            ("ESCAPE", 1),
            ("1", 2),
            ("2", 3),
            ("3", 4),
            ("4", 5),
            ("5", 6),
            ("6", 7),
            ("7", 8),
            ("8", 9),
            ("9", 10),
            ("0", 11),
            ("MINUS", 12),
            ("EQUAL", 13),
            ("BACKSPACE", 14),
            ("TAB", 15),
            ("Q", 16),
            ("W", 17),
            ("E", 18),
            ("R", 19),
            ("T", 20),
            ("Y", 21),
            ("U", 22),
            ("I", 23),
            ("O", 24),
            ("P", 25),
            ("LEFTBRACE", 26),
            ("RIGHTBRACE", 27),
            ("ENTER", 28),
            ("LEFTCTRL", 29),
            ("LEFT_CTRL", 29),
            ("A", 30),
            ("S", 31),
            ("D", 32),
            ("F", 33),
            ("G", 34),
            ("H", 35),
            ("J", 36),
            ("K", 37),
            ("L", 38),
            ("SEMICOLON", 39),
            ("APOSTROPHE", 40),
            ("GRAVE", 41),
            ("LEFTSHIFT", 42),
            ("LEFT_SHIFT", 42),
            ("BACKSLASH", 43),
            ("Z", 44),
            ("X", 45),
            ("C", 46),
            ("V", 47),
            ("B", 48),
            ("N", 49),
            ("M", 50),
            ("COMMA", 51),
            ("DOT", 52),
            ("SLASH", 53),
            ("RIGHTSHIFT", 54),
            ("RIGHT_SHIFT", 54),
            ("KPASTERISK", 55),
            ("LEFTALT", 56),
            ("LEFT_ALT", 56),
            ("SPACE", 57),
            ("CAPSLOCK", 58),
            ("F1", 59),
            ("F2", 60),
            ("F3", 61),
            ("F4", 62),
            ("F5", 63),
            ("F6", 64),
            ("F7", 65),
            ("F8", 66),
            ("F9", 67),
            ("F10", 68),
            ("NUMLOCK", 69),
            ("SCROLLLOCK", 70),
            ("F11", 87),
            ("F12", 88),
            ("KPENTER", 96),
            ("RIGHTCTRL", 97),
            ("RIGHT_CTRL", 97),
            ("KPSLASH", 98),
            ("SYSRQ", 99),
            ("PRINT", 99),
            ("RIGHTALT", 100),
            ("RIGHT_ALT", 100),
            ("HOME", 102),
            ("UP", 103),
            ("PAGEUP", 104),
            ("PAGE_UP", 104),
            ("LEFT", 105),
            ("RIGHT", 106),
            ("END", 107),
            ("DOWN", 108),
            ("PAGEDOWN", 109),
            ("PAGE_DOWN", 109),
            ("INSERT", 110),
            ("DELETE", 111),
            ("MUTE", 113),
            ("VOLUMEDOWN", 114),
            ("VOLUMEUP", 115),
            ("PAUSE", 119),
            ("LEFTMETA", 125),
            ("LEFT_META", 125),
            ("RIGHTMETA", 126),
            ("RIGHT_META", 126),
            ("COMPOSE", 127),
            ("MENU", 139),
            ("F13", 183),
            ("F14", 184),
            ("F15", 185),
            ("F16", 186),
            ("F17", 187),
            ("F18", 188),
            ("F19", 189),
            ("F20", 190),
            ("F21", 191),
            ("F22", 192),
            ("F23", 193),
            ("F24", 194),
            ("BTN_LEFT", 0x110),
            ("BTN_RIGHT", 0x111),
            ("BTN_MIDDLE", 0x112),
            ("BTN_SIDE", 0x113),
            ("BTN_EXTRA", 0x114),
            ("BTN_FORWARD", 0x115),
            ("BTN_BACK", 0x116),
            ("CONTEXT_MENU", 0x1b6),
        ]
    })
}

/// Try to resolve a key name to a key code.
///
/// Lookup is case-insensitive and accepts the input-event-codes.h `KEY_`
/// prefix, so `KEY_CAPSLOCK` and `capslock` both resolve. `BTN_` names are
/// matched verbatim since the prefix disambiguates button codes.
pub fn key_from_name(name: &str) -> Option<Key> {
    let upper = name.to_uppercase();
    let lookup = upper.strip_prefix("KEY_").unwrap_or(&upper);
    name_table()
        .iter()
        .find(|(n, _)| *n == lookup)
        .map(|(_, code)| Key::from(*code))
}

/// Display name for a key code, for logging and config diagnostics
pub fn key_name(code: u16) -> &'static str {
    name_table()
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(n, _)| *n)
        .unwrap_or("UNKNOWN")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(key_from_name("a"), Some(Key::from(30)));
        assert_eq!(key_from_name("A"), Some(Key::from(30)));
        assert_eq!(key_from_name("ENTER"), Some(Key::from(28)));
        assert_eq!(key_from_name("1"), Some(Key::from(2)));
        assert_eq!(key_from_name("0"), Some(Key::from(11)));
        assert_eq!(key_from_name("nosuchkey"), None);
    }

    #[test]
    fn test_key_from_name_prefixed() {
        assert_eq!(key_from_name("KEY_CAPSLOCK"), key_from_name("CAPSLOCK"));
        assert_eq!(key_from_name("KEY_H"), Some(Key::from(35)));
        assert_eq!(key_from_name("BTN_LEFT"), Some(Key::from(0x110)));
        assert_eq!(key_from_name("BTN_BACK"), Some(Key::from(0x116)));
    }

    #[test]
    fn test_key_from_name_aliases() {
        assert_eq!(key_from_name("LEFT_CTRL"), key_from_name("LEFTCTRL"));
        assert_eq!(key_from_name("PAGE_UP"), key_from_name("PAGEUP"));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::from(30).to_string(), "A");
        assert_eq!(Key::from(28).to_string(), "ENTER");
        assert_eq!(Key::from(0x2ff).to_string(), "UNKNOWN");
    }

    #[test]
    fn test_key_ordering_and_hash() {
        use std::collections::HashMap;
        assert!(Key::from(30) < Key::from(31));
        let mut map = HashMap::new();
        map.insert(Key::from(30), "value");
        assert_eq!(map.get(&Key::from(30)), Some(&"value"));
    }
}
