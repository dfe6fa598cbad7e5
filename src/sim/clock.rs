/// Minute clock for a simulation run.
///
/// Yields each minute of the run exactly once, starting at 0.
///
/// # Examples
///
/// ```
/// use voltpath::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut minutes = Vec::new();
///
/// clock.run(|minute| minutes.push(minute));
/// assert_eq!(minutes, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next minute to hand out
    current: u32,
    /// Length of the run in minutes
    total: u32,
}

impl Clock {
    /// Creates a clock for a run of `total` minutes.
    pub fn new(total: u32) -> Self {
        Self { current: 0, total }
    }

    /// Advances the clock by one minute.
    ///
    /// # Returns
    ///
    /// * `Some(minute)` - The minute being entered
    /// * `None` - If the run is over
    pub fn tick(&mut self) -> Option<u32> {
        if self.current < self.total {
            let minute = self.current;
            self.current += 1;
            Some(minute)
        } else {
            None
        }
    }

    /// Minutes left before the run ends.
    pub fn remaining(&self) -> u32 {
        self.total - self.current
    }

    /// Calls `f` for every remaining minute.
    pub fn run(&mut self, mut f: impl FnMut(u32)) {
        while let Some(minute) = self.tick() {
            f(minute);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick() {
        let mut clock = Clock::new(2);
        assert_eq!(clock.tick(), Some(0));
        assert_eq!(clock.remaining(), 1);
        assert_eq!(clock.tick(), Some(1));
        assert_eq!(clock.tick(), None);
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_full_day() {
        let mut clock = Clock::new(1440);
        let mut count = 0;
        let mut last = 0;
        clock.run(|m| {
            count += 1;
            last = m;
        });
        assert_eq!(count, 1440);
        assert_eq!(last, 1439);
    }

    #[test]
    fn test_empty_clock() {
        let mut clock = Clock::new(0);
        assert_eq!(clock.tick(), None);

        let mut was_called = false;
        clock.run(|_| was_called = true);
        assert!(!was_called);
    }
}
