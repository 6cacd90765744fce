//! Dependency-triggered effects

/// Runs when a watched dependency changes, subject to a guard.
///
/// The guard is evaluated only at the moment a change is observed; a change
/// that happens while the guard is false is consumed and will not fire later.
/// Construction records the initial value, so nothing fires before the first
/// change.
#[derive(Debug, Clone)]
pub struct Effect<D> {
    last_seen: D,
}

impl<D: Clone + PartialEq> Effect<D> {
    pub fn new(initial: D) -> Self {
        Self { last_seen: initial }
    }

    /// Record `deps` and report whether the effect should run.
    pub fn observe(&mut self, deps: &D, guard: impl FnOnce() -> bool) -> bool {
        if *deps == self.last_seen {
            return false;
        }
        self.last_seen = deps.clone();
        guard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_dependency_never_fires() {
        let mut effect = Effect::new(1);
        assert!(!effect.observe(&1, || true));
    }

    #[test]
    fn test_change_fires_once() {
        let mut effect = Effect::new(1);
        assert!(effect.observe(&2, || true));
        assert!(!effect.observe(&2, || true));
    }

    #[test]
    fn test_guarded_change_is_consumed() {
        let mut effect = Effect::new("a");
        assert!(!effect.observe(&"b", || false));
        assert!(!effect.observe(&"b", || true));
        assert!(effect.observe(&"c", || true));
    }
}
