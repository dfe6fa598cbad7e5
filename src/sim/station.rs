use std::collections::VecDeque;

use crate::placement::StationLevel;

/// A car waiting at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedCar {
    /// Segment the car came from.
    pub origin: u32,
    /// Minute it joined the queue.
    pub queued_at: u32,
}

/// Charging station state during a run.
///
/// Ports charge one car each. Arriving cars wait in a FIFO queue that holds
/// at most as many cars as there are ports; a car that finds it full balks.
#[derive(Debug, Clone)]
pub struct ChargingStation {
    lhrs: u32,
    level: StationLevel,
    queue: VecDeque<QueuedCar>,
    charging: u32,
    charge_minutes: u64,
    wait_minutes: u64,
    cars_started: u64,
}

impl ChargingStation {
    pub fn new(lhrs: u32, level: StationLevel) -> Self {
        Self {
            lhrs,
            level,
            queue: VecDeque::with_capacity(level.ports() as usize),
            charging: 0,
            charge_minutes: 0,
            wait_minutes: 0,
            cars_started: 0,
        }
    }

    pub fn lhrs(&self) -> u32 {
        self.lhrs
    }

    pub fn level(&self) -> StationLevel {
        self.level
    }

    pub fn ports(&self) -> u32 {
        self.level.ports()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_full(&self) -> bool {
        self.queue.len() >= self.ports() as usize
    }

    pub fn has_free_port(&self) -> bool {
        self.charging < self.ports()
    }

    pub fn charging(&self) -> u32 {
        self.charging
    }

    /// Puts a car in the waiting queue. Returns `false` if the queue is full.
    pub fn enqueue(&mut self, origin: u32, now: u32) -> bool {
        if self.queue_full() {
            return false;
        }
        self.queue.push_back(QueuedCar {
            origin,
            queued_at: now,
        });
        true
    }

    /// Moves the head of the queue onto a free port for `charge_minutes`.
    ///
    /// Returns the car, or `None` if the queue is empty or every port is busy.
    pub fn start_charging(&mut self, now: u32, charge_minutes: u32) -> Option<QueuedCar> {
        if !self.has_free_port() {
            return None;
        }
        let car = self.queue.pop_front()?;
        self.charging += 1;
        self.cars_started += 1;
        self.charge_minutes += u64::from(charge_minutes);
        self.wait_minutes += u64::from(now.saturating_sub(car.queued_at));
        Some(car)
    }

    /// Frees the port of a car that finished charging.
    pub fn release(&mut self) {
        self.charging = self.charging.saturating_sub(1);
    }

    /// Cars that started charging.
    pub fn cars_started(&self) -> u64 {
        self.cars_started
    }

    /// Total charge time booked on this station (minutes).
    pub fn charge_minutes(&self) -> u64 {
        self.charge_minutes
    }

    /// Mean wait before charging, `None` if no car started.
    pub fn average_wait_minutes(&self) -> Option<f64> {
        (self.cars_started > 0).then(|| self.wait_minutes as f64 / self.cars_started as f64)
    }

    /// Booked charge time over port-minutes available, capped at 1.
    pub fn utilization(&self, duration_minutes: u32) -> f64 {
        let capacity = f64::from(duration_minutes) * f64::from(self.ports());
        if capacity <= 0.0 {
            return 0.0;
        }
        (self.charge_minutes as f64 / capacity).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_capacity_equals_ports() {
        let mut st = ChargingStation::new(1, StationLevel::Level1);
        assert!(st.enqueue(10, 0));
        assert!(st.enqueue(11, 0));
        assert!(st.queue_full());
        assert!(!st.enqueue(12, 0));
        assert_eq!(st.queue_len(), 2);
    }

    #[test]
    fn start_charging_is_fifo_and_records_wait() {
        let mut st = ChargingStation::new(1, StationLevel::Level1);
        st.enqueue(10, 0);
        st.enqueue(11, 2);

        let first = st.start_charging(5, 20).expect("port free");
        assert_eq!(first.origin, 10);
        let second = st.start_charging(6, 10).expect("port free");
        assert_eq!(second.origin, 11);

        assert_eq!(st.cars_started(), 2);
        assert_eq!(st.charge_minutes(), 30);
        // waits of 5 and 4 minutes
        assert_eq!(st.average_wait_minutes(), Some(4.5));
    }

    #[test]
    fn busy_ports_block_start() {
        let mut st = ChargingStation::new(1, StationLevel::Level1);
        for origin in 0..2 {
            st.enqueue(origin, 0);
            st.start_charging(0, 20);
        }
        st.enqueue(9, 1);
        assert!(!st.has_free_port());
        assert_eq!(st.start_charging(1, 20), None);

        st.release();
        assert_eq!(st.start_charging(20, 20).map(|c| c.origin), Some(9));
    }

    #[test]
    fn empty_queue_starts_nothing() {
        let mut st = ChargingStation::new(1, StationLevel::Level2);
        assert_eq!(st.start_charging(0, 20), None);
        assert_eq!(st.average_wait_minutes(), None);
    }

    #[test]
    fn utilization_is_capped() {
        let mut st = ChargingStation::new(1, StationLevel::Level1);
        st.enqueue(0, 0);
        st.start_charging(0, 60);
        // 60 of 2 * 60 port-minutes
        assert_eq!(st.utilization(60), 0.5);
        st.enqueue(0, 0);
        st.start_charging(0, 500);
        assert_eq!(st.utilization(60), 1.0);
        assert_eq!(st.utilization(0), 0.0);
    }
}
