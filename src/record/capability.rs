use std::collections::BTreeSet;

/// Per-record bookkeeping for lazy capability activation.
///
/// Every declared capability starts in `pending`. The first dispatch moves
/// it to `activated` before the body runs, so a failed first run still
/// counts as activated and is never retried.
#[derive(Debug, Default, Clone)]
pub(crate) struct ActivationState {
    pending: BTreeSet<&'static str>,
    activated: BTreeSet<&'static str>,
}

pub(crate) enum Dispatch {
    /// First call: run the capability body
    Activate(&'static str),
    /// Already activated: free no-op
    AlreadyActive,
    /// Not a declared capability
    Unknown,
}

impl ActivationState {
    pub fn new(names: impl Iterator<Item = &'static str>) -> Self {
        Self {
            pending: names.collect(),
            activated: BTreeSet::new(),
        }
    }

    pub fn dispatch(&mut self, name: &str) -> Dispatch {
        if let Some(&owned) = self.pending.get(name) {
            self.pending.remove(name);
            self.activated.insert(owned);
            Dispatch::Activate(owned)
        } else if self.activated.contains(name) {
            Dispatch::AlreadyActive
        } else {
            Dispatch::Unknown
        }
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains(name)
    }

    pub fn is_activated(&self, name: &str) -> bool {
        self.activated.contains(name)
    }
}
