//! Gated running average for integrated loudness.

use super::window::FLOOR_DB;

/// Energy accumulator behind the integrated estimate.
///
/// A single gate is applied: each evaluated momentary level above the
/// threshold contributes `10^(dB/10)` of linear energy. There is no
/// second, relative gate pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationState {
    energy_sum: f64,
    count: u64,
}

impl IntegrationState {
    pub const fn new() -> Self {
        Self {
            energy_sum: 0.0,
            count: 0,
        }
    }

    /// Feed one evaluated momentary level. Returns whether it passed the gate.
    #[inline]
    pub fn accumulate(&mut self, momentary_db: f64, gate_db: f64) -> bool {
        if momentary_db > gate_db {
            self.energy_sum += 10f64.powf(momentary_db / 10.0);
            self.count += 1;
            true
        } else {
            false
        }
    }

    /// Gated mean energy in dB, or the floor before any block has passed.
    #[inline]
    pub fn integrated_db(&self) -> f64 {
        if self.count == 0 {
            return FLOOR_DB;
        }

        let mean = self.energy_sum / self.count as f64;
        if mean > 0.0 {
            10.0 * mean.log10()
        } else {
            FLOOR_DB
        }
    }

    pub fn energy_sum(&self) -> f64 {
        self.energy_sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const GATE: f64 = -70.0;

    #[test]
    fn test_empty_state_is_floored() {
        assert_eq!(IntegrationState::new().integrated_db(), FLOOR_DB);
    }

    #[test]
    fn test_gate_excludes_quiet_blocks() {
        let mut state = IntegrationState::new();
        assert!(!state.accumulate(-70.0, GATE));
        assert!(!state.accumulate(FLOOR_DB, GATE));
        assert_eq!(state.count(), 0);
        assert_eq!(state.integrated_db(), FLOOR_DB);
    }

    #[test]
    fn test_single_block_round_trips() {
        let mut state = IntegrationState::new();
        assert!(state.accumulate(-23.0, GATE));
        assert_abs_diff_eq!(state.integrated_db(), -23.0, epsilon = 1e-9);
    }

    #[test]
    fn test_average_is_energy_domain() {
        let mut state = IntegrationState::new();
        state.accumulate(-10.0, GATE);
        state.accumulate(-20.0, GATE);
        // mean(0.1, 0.01) = 0.055
        assert_abs_diff_eq!(state.integrated_db(), 10.0 * 0.055f64.log10(), epsilon = 1e-9);
        assert_eq!(state.count(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = IntegrationState::new();
        state.accumulate(-6.0, GATE);
        state.reset();
        assert_eq!(state, IntegrationState::new());
        assert_eq!(state.integrated_db(), FLOOR_DB);
    }
}
