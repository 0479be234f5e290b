use bidroute_core::Timestamp;
use bidroute_ports::Clock;
use chrono::Utc;

/// Wall-clock time, used for request timestamps and real-time windows in production
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let clock = SystemClock::new();
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        assert!(now >= before && now <= after);
        assert!(after - before < Duration::seconds(1));
    }
}
