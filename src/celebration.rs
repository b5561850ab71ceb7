/// Trigger counter for the confetti burst. Hosts render a new burst whenever
/// the value changes; the sessions never read it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Celebration {
    trigger: u64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&mut self) -> u64 {
        self.trigger = self.trigger.saturating_add(1);
        self.trigger
    }

    pub fn trigger(&self) -> u64 {
        self.trigger
    }
}
