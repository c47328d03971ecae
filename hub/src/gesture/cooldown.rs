//! Minimum spacing between discrete triggers of one category.

/// Cooldown gate.  Ready until `start` is called, then blocked for
/// `interval_ms`.
#[derive(Debug, Clone)]
pub struct Cooldown {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Cooldown {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) => now_ms - last >= self.interval_ms,
            None => true,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        match self.last_ms {
            Some(last) => (self.interval_ms - (now_ms - last)).max(0.0),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_initially() {
        let c = Cooldown::new(500.0);
        assert!(c.ready(0.0));
        assert_eq!(c.remaining_ms(0.0), 0.0);
    }

    #[test]
    fn test_blocks_for_interval() {
        let mut c = Cooldown::new(500.0);
        c.start(1000.0);
        assert!(!c.ready(1000.0));
        assert!(!c.ready(1499.0));
        assert!((c.remaining_ms(1200.0) - 300.0).abs() < 0.001);
        assert!(c.ready(1500.0));
    }
}
