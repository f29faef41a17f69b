// Vimproved Modifier Predicate
// Classifies key codes as modifier keys (shift, ctrl, alt, meta, capslock)

use crate::Key;

/// Key codes classified as modifiers.
///
/// Capslock counts as a modifier here: a capslock press while a dual-role
/// key is held must cancel the tap, same as shift or ctrl would.
const MODIFIER_KEY_CODES: &[u16] = &[
    42, 54, // LEFT_SHIFT, RIGHT_SHIFT
    29, 97, // LEFT_CTRL, RIGHT_CTRL
    56, 100, // LEFT_ALT, RIGHT_ALT
    125, 126, // LEFT_META, RIGHT_META
    58, // CAPSLOCK
];

/// Check if a key code is a modifier (O(1) against a const array, no locks)
#[inline]
pub const fn is_modifier_code(code: u16) -> bool {
    let mut i = 0;
    while i < MODIFIER_KEY_CODES.len() {
        if MODIFIER_KEY_CODES[i] == code {
            return true;
        }
        i += 1;
    }
    false
}

/// Check if a key is a modifier
#[inline]
pub fn is_modifier(key: Key) -> bool {
    is_modifier_code(key.code())
}
