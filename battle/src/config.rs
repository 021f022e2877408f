//! Battle rules configuration

use std::time::Duration;

/// Tunable rules shared by every battle a manager runs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Fighters per team
    pub team_size: usize,
    /// Energy units each living fighter generates at start of turn
    pub energy_per_fighter: u32,
    /// Time a side has to submit before it is skipped
    pub turn_duration: Duration,
    /// Same-type bonus multiplier (1.0 disables it)
    pub stab_multiplier: f32,
    /// Chance in [0, 1] that a damaging hit is critical
    pub critical_chance: f64,
    pub critical_multiplier: f32,
    /// Log entries included in protocol snapshots
    pub max_log_tail: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            team_size: 3,
            energy_per_fighter: 1,
            turn_duration: Duration::from_secs(60),
            stab_multiplier: 1.0,
            critical_chance: 0.0,
            critical_multiplier: 1.5,
            max_log_tail: 50,
        }
    }
}

impl BattleConfig {
    /// Critical chance clamped to a valid probability
    pub(crate) fn critical_probability(&self) -> f64 {
        if self.critical_chance.is_nan() {
            return 0.0;
        }
        self.critical_chance.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BattleConfig::default();
        assert_eq!(config.team_size, 3);
        assert_eq!(config.turn_duration, Duration::from_secs(60));
        assert_eq!(config.stab_multiplier, 1.0);
        assert_eq!(config.critical_probability(), 0.0);
    }

    #[test]
    fn test_critical_probability_clamped() {
        let config = BattleConfig {
            critical_chance: 3.0,
            ..Default::default()
        };
        assert_eq!(config.critical_probability(), 1.0);

        let config = BattleConfig {
            critical_chance: f64::NAN,
            ..Default::default()
        };
        assert_eq!(config.critical_probability(), 0.0);
    }
}
