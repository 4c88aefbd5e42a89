use std::time::{Duration, Instant};

use crate::geometry::Size;

/// Coalesces viewport-resize bursts so re-placement runs at most once per
/// quiet period. Time is injected so the policy is testable without
/// sleeping.
pub struct ResizeDebouncer {
    quiet: Duration,
    pending: Option<(Size, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Record a resize. A newer notification replaces the pending one and
    /// restarts the quiet period.
    pub fn notify(&mut self, size: Size, now: Instant) {
        self.pending = Some((size, now));
    }

    /// Yield the latest size once the quiet period has elapsed. At most one
    /// yield per burst.
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        let (size, at) = self.pending?;
        if now.duration_since(at) < self.quiet {
            return None;
        }
        self.pending = None;
        Some(size)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_the_latest_size() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        debouncer.notify(Size::new(800.0, 600.0), t0);
        debouncer.notify(Size::new(900.0, 700.0), t0 + Duration::from_millis(50));

        assert_eq!(debouncer.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            debouncer.poll(t0 + Duration::from_millis(150)),
            Some(Size::new(900.0, 700.0))
        );
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn zero_quiet_period_fires_immediately() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(0));
        let t0 = Instant::now();
        debouncer.notify(Size::new(800.0, 600.0), t0);
        assert!(debouncer.poll(t0).is_some());
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn idle_debouncer_yields_nothing() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(100));
        assert_eq!(debouncer.poll(Instant::now()), None);
    }
}
