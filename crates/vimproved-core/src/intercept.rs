// Vimproved Intercept State Machine
// One dual-role key: tap for one code, hold for a modifier or a layer

use std::collections::{BTreeSet, HashMap};

use smallvec::SmallVec;

use crate::event::{tap_combo, Direction, Event};
use crate::key::Key;
use crate::modifier::is_modifier;

/// Buffer for synthetic events emitted while processing one input event.
///
/// Six slots cover the common bursts inline (tap combo, modifier down plus
/// sync); a forced release of many held keys spills to the heap.
pub type Emitted = SmallVec<[Event; 6]>;

/// Errors detected when an intercept specification is built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("hold key {0} is not a modifier")]
    NotAModifier(Key),

    #[error("layer for {0} has no mappings")]
    EmptyLayer(Key),
}

/// Hold behavior of a dual-role key
#[derive(Debug, Clone)]
pub enum Behavior {
    /// While held, remap the configured keys to different codes
    Layer { map: HashMap<Key, Key> },
    /// While held, act as this modifier for any other key pressed
    Modifier { modifier: Key },
}

/// Dual-role key specification.
///
/// Built once at startup by the configuration collaborator and immutable
/// afterwards. The checked constructors are the only way to build one, so
/// a `Modifier` spec always names a real modifier key.
#[derive(Debug, Clone)]
pub struct InterceptSpec {
    intercept: Key,
    tap: Key,
    behavior: Behavior,
}

impl InterceptSpec {
    /// Layer spec: hold `intercept` to remap the keys in `map`
    pub fn layer(intercept: Key, tap: Key, map: HashMap<Key, Key>) -> Result<Self, SpecError> {
        if map.is_empty() {
            return Err(SpecError::EmptyLayer(intercept));
        }
        Ok(Self {
            intercept,
            tap,
            behavior: Behavior::Layer { map },
        })
    }

    /// Modifier spec: hold `intercept` to act as `modifier`
    pub fn modifier(intercept: Key, tap: Key, modifier: Key) -> Result<Self, SpecError> {
        if !is_modifier(modifier) {
            return Err(SpecError::NotAModifier(modifier));
        }
        Ok(Self {
            intercept,
            tap,
            behavior: Behavior::Modifier { modifier },
        })
    }

    /// The intercepted physical key
    pub fn intercept(&self) -> Key {
        self.intercept
    }

    /// The code emitted when the key is tapped
    pub fn tap(&self) -> Key {
        self.tap
    }

    /// The hold behavior
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// True for Modifier specs; used to order the coordinator's list
    pub fn is_modifier_spec(&self) -> bool {
        matches!(self.behavior, Behavior::Modifier { .. })
    }
}

/// States of the intercept machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Intercept key is up, nothing pending
    Start,
    /// Intercept key is down, tap still possible
    InterceptHeld,
    /// Layer only: one or more remapped keys are currently down
    OtherHeld,
}

/// Live state machine for one dual-role key.
///
/// Owned by value in the coordinator's list; mutated only by sequential
/// `process` calls. `held` is used by Layer behavior and stays empty for
/// Modifier, which never enters `OtherHeld`.
#[derive(Debug)]
pub struct Intercept {
    spec: InterceptSpec,
    state: State,
    emit_tap: bool,
    held: BTreeSet<Key>,
}

impl Intercept {
    /// Create a fresh machine for a spec, in the `Start` state
    pub fn new(spec: InterceptSpec) -> Self {
        Self {
            spec,
            state: State::Start,
            emit_tap: true,
            held: BTreeSet::new(),
        }
    }

    /// The spec this machine runs
    pub fn spec(&self) -> &InterceptSpec {
        &self.spec
    }

    /// Current state, for diagnostics and tests
    pub fn state(&self) -> State {
        self.state
    }

    fn matches(&self, event: &Event) -> bool {
        event.code == self.spec.intercept.code()
    }

    /// Run one key event through the machine.
    ///
    /// Synthetic events are appended to `out` in emission order. Returns
    /// true when the original event should still be forwarded downstream;
    /// false means this machine consumed it.
    pub fn process(&mut self, event: &Event, out: &mut Emitted) -> bool {
        match self.state {
            State::Start => self.process_start(event),
            State::InterceptHeld => self.process_intercepted_held(event, out),
            State::OtherHeld => self.process_other_held(event, out),
        }
    }

    fn process_start(&mut self, event: &Event) -> bool {
        if self.matches(event) && event.direction() == Some(Direction::Down) {
            self.emit_tap = true;
            self.state = State::InterceptHeld;
            return false;
        }
        true
    }

    fn process_intercepted_held(&mut self, event: &Event, out: &mut Emitted) -> bool {
        let matches = self.matches(event);

        // The intercepted key's own re-down or repeat is always swallowed.
        if matches && event.direction() != Some(Direction::Up) {
            return false;
        }

        match &self.spec.behavior {
            Behavior::Layer { map } => {
                if matches {
                    // Intercept released with no remapped key engaged.
                    if self.emit_tap {
                        out.extend(tap_combo(self.spec.tap));
                        self.emit_tap = false;
                    }
                    self.state = State::Start;
                    return false;
                }

                if event.direction() == Some(Direction::Down) {
                    let code = event.key_code();
                    let mapped = map.get(&code).copied();

                    // An ordinary key down does not cancel the tap; only a
                    // mapped key or a modifier does. Keeps fast typing with
                    // overlapping strokes intact, e.g.
                    // L_DOWN, SPACE_DOWN, A_DOWN, L_UP, A_UP, SPACE_UP.
                    self.emit_tap &= mapped.is_none() && !is_modifier(code);

                    if let Some(to) = mapped {
                        self.held.insert(code);
                        out.push(event.with_code(to));
                        self.state = State::OtherHeld;
                        return false;
                    }
                }

                true
            }
            Behavior::Modifier { modifier } => {
                let modifier = *modifier;

                if matches {
                    // Intercept released: tap if nothing intervened,
                    // otherwise release the engaged modifier.
                    if self.emit_tap {
                        out.extend(tap_combo(self.spec.tap));
                    } else {
                        out.push(event.with_code(modifier));
                    }
                    self.state = State::Start;
                    return false;
                }

                if event.direction() == Some(Direction::Down) && self.emit_tap {
                    // First other key pressed during the hold: engage the
                    // modifier ahead of it. The triggering event must still
                    // be forwarded independently so later machines in the
                    // chain see it too.
                    out.push(event.with_code(modifier));
                    out.push(Event::syn());
                    self.emit_tap = false;
                    return true;
                }

                true
            }
        }
    }

    fn process_other_held(&mut self, event: &Event, out: &mut Emitted) -> bool {
        let map = match &self.spec.behavior {
            Behavior::Layer { map } => map,
            // Modifier never transitions to OtherHeld; keep the arm as a
            // pass-through to satisfy the shared state-machine contract.
            Behavior::Modifier { .. } => return true,
        };

        let matches = self.matches(event);
        if matches && event.direction() != Some(Direction::Up) {
            return false;
        }

        let code = event.key_code();
        match event.direction() {
            Some(Direction::Up) => {
                if self.held.contains(&code) {
                    // A remapped held key goes up.
                    if let Some(to) = map.get(&code).copied() {
                        out.push(event.with_code(to));
                    }
                    self.held.remove(&code);
                    if self.held.is_empty() {
                        self.state = State::InterceptHeld;
                    }
                    false
                } else if matches {
                    // Intercept released while remapped keys are still down:
                    // force-release every one of them so nothing is left
                    // logically held when the layer ends.
                    for held in &self.held {
                        if let Some(to) = map.get(held).copied() {
                            out.push(Event::key_up(to));
                            out.push(Event::syn());
                        }
                    }
                    self.held.clear();
                    self.state = State::Start;
                    false
                } else {
                    true
                }
            }
            Some(Direction::Down) | Some(Direction::Repeat) => {
                if event.direction() == Some(Direction::Down) && self.held.contains(&code) {
                    // Duplicate down of an already-remapped key; repeat for
                    // remapped keys is re-derived from their own Repeat
                    // events below.
                    return false;
                }
                if let Some(to) = map.get(&code).copied() {
                    out.push(event.with_code(to));
                    if event.direction() == Some(Direction::Down) {
                        self.held.insert(code);
                    }
                    false
                } else {
                    true
                }
            }
            None => true,
        }
    }
}
