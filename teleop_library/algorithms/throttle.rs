//! Tick-count rate limiter
//!
//! Lets one tick in every `period` through, for output that should not run
//! at the full loop rate (console telemetry in particular).

/// Counts ticks and fires on every `period`-th one
#[derive(Debug, Clone)]
pub struct TickThrottle {
    period: u32,
    loops: u32,
}

impl TickThrottle {
    /// `period` of 0 is treated as 1 (fire every tick)
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            loops: 0,
        }
    }

    /// Advance one tick; true when this tick should emit
    pub fn ready(&mut self) -> bool {
        self.loops += 1;
        if self.loops >= self.period {
            self.loops = 0;
            true
        } else {
            false
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tenth_tick() {
        let mut throttle = TickThrottle::new(10);
        let fired: Vec<usize> = (1..=30).filter(|_| throttle.ready()).collect();
        assert_eq!(fired, vec![10, 20, 30]);
    }

    #[test]
    fn test_zero_period_fires_every_tick() {
        let mut throttle = TickThrottle::new(0);
        assert!(throttle.ready());
        assert!(throttle.ready());
    }
}
