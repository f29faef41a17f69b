// Vimproved Interceptor
// Runs every incoming event through the ordered list of intercept machines

use crate::event::Event;
use crate::intercept::{Emitted, Intercept, InterceptSpec};

/// Coordinator over the ordered intercept list.
///
/// The spec list must put Modifier intercepts before Layer intercepts: a
/// layer emits a remapped key the moment it sees the down event, and a
/// still-pending modifier processed after it would emit its modifier-down
/// too late. The config collaborator orders the list; the coordinator
/// takes it as given.
#[derive(Debug)]
pub struct Interceptor {
    intercepts: Vec<Intercept>,
}

impl Interceptor {
    /// Build the coordinator, one machine per spec, preserving list order
    pub fn new(specs: Vec<InterceptSpec>) -> Self {
        Self {
            intercepts: specs.into_iter().map(Intercept::new).collect(),
        }
    }

    /// Number of intercept machines
    pub fn len(&self) -> usize {
        self.intercepts.len()
    }

    /// True when no intercepts are configured
    pub fn is_empty(&self) -> bool {
        self.intercepts.is_empty()
    }

    /// Process one event.
    ///
    /// Synthetic events are appended to `out` in emission order and must be
    /// written to the output before the original event. Returns true when
    /// the original event should be forwarded.
    ///
    /// Scan-code informational events are dropped outright; other non-key
    /// events bypass the machines and are forwarded as-is.
    pub fn process(&mut self, event: &Event, out: &mut Emitted) -> bool {
        if event.is_scan_code() {
            return false;
        }
        if !event.is_key() {
            return true;
        }

        // Every machine sees the event, in list order; the original is
        // forwarded only if all of them pass it through.
        let mut forward = true;
        for intercept in &mut self.intercepts {
            forward &= intercept.process(event, out);
        }
        forward
    }
}
