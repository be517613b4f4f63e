use std::fmt;

/// State of a traffic signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    Red,
    Yellow,
    Green,
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalState::Red => "red",
            SignalState::Yellow => "yellow",
            SignalState::Green => "green",
        };
        f.write_str(label)
    }
}

pub const DEFAULT_TRANSITION_TIME: u32 = 5;

/// Per-intersection traffic-light state machine.
///
/// The signal never advances on its own: the caller supplies elapsed
/// seconds and drives [`advance`](Self::advance) from its loop. Yellow is
/// the only state entered both on the way into and out of green; red has
/// no timer-driven exit and stays until the signal is forced toward green.
#[derive(Debug, Clone)]
pub struct TrafficSignal {
    /// Leading letter of the intersection this signal belongs to.
    pub intersection: char,
    state: SignalState,
    /// Seconds the green state is held. Congestion updates extend this.
    pub green_duration: u32,
    /// Seconds the yellow state is held. Fixed at construction.
    transition_time: u32,
    /// Clock reading when the current state began.
    state_started: u64,
}

impl TrafficSignal {
    /// Creates a red signal. A negative duration is normalised to its
    /// absolute value, matching the inherited constructor behaviour.
    pub fn new(intersection: char, green_duration: i32) -> Self {
        Self {
            intersection,
            state: SignalState::Red,
            green_duration: green_duration.unsigned_abs(),
            transition_time: DEFAULT_TRANSITION_TIME,
            state_started: 0,
        }
    }

    pub fn with_transition(mut self, transition_time: i32) -> Self {
        self.transition_time = transition_time.unsigned_abs();
        self
    }

    pub fn state(&self) -> SignalState {
        self.state
    }

    pub fn set_state(&mut self, state: SignalState) {
        self.state = state;
    }

    pub fn transition_time(&self) -> u32 {
        self.transition_time
    }

    /// Advances the state machine given the current elapsed-seconds clock:
    /// yellow turns green once the transition time has passed, green turns
    /// red once the green duration has passed, red waits to be forced.
    pub fn advance(&mut self, now: u64) {
        if self.state == SignalState::Yellow
            && now.saturating_sub(self.state_started) >= u64::from(self.transition_time)
        {
            self.state = SignalState::Green;
            self.state_started = now;
        }
        if self.state == SignalState::Green
            && now.saturating_sub(self.state_started) >= u64::from(self.green_duration)
        {
            self.state = SignalState::Red;
            self.state_started = now;
        }
    }

    /// Forces the signal toward green: any state drops into yellow and the
    /// state clock restarts, so the green cycle begins ahead of neighbours.
    pub fn force_green(&mut self, now: u64) {
        self.state = SignalState::Yellow;
        self.state_started = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_red_and_red_never_self_exits() {
        let mut signal = TrafficSignal::new('A', 30);
        assert_eq!(signal.state(), SignalState::Red);
        signal.advance(1_000_000);
        assert_eq!(signal.state(), SignalState::Red);
    }

    #[test]
    fn forced_signal_cycles_yellow_green_red() {
        let mut signal = TrafficSignal::new('A', 30);
        signal.force_green(0);
        assert_eq!(signal.state(), SignalState::Yellow);

        signal.advance(4);
        assert_eq!(signal.state(), SignalState::Yellow);
        signal.advance(5);
        assert_eq!(signal.state(), SignalState::Green);

        signal.advance(34);
        assert_eq!(signal.state(), SignalState::Green);
        signal.advance(35);
        assert_eq!(signal.state(), SignalState::Red);
    }

    #[test]
    fn force_green_restarts_the_state_clock() {
        let mut signal = TrafficSignal::new('B', 10);
        signal.force_green(0);
        signal.advance(5);
        assert_eq!(signal.state(), SignalState::Green);
        // Forcing again mid-green drops back to yellow with a fresh clock.
        signal.force_green(7);
        assert_eq!(signal.state(), SignalState::Yellow);
        signal.advance(11);
        assert_eq!(signal.state(), SignalState::Yellow);
        signal.advance(12);
        assert_eq!(signal.state(), SignalState::Green);
    }

    #[test]
    fn negative_durations_are_normalised() {
        let signal = TrafficSignal::new('C', -45).with_transition(-3);
        assert_eq!(signal.green_duration, 45);
        assert_eq!(signal.transition_time(), 3);
    }
}
