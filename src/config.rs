//! Game configuration: stage table, effect timings and presentation choice

use crate::effects::PresentationMode;
use crate::session::StageTable;
use std::time::Duration;

/// Fixed delays attached to each presentation effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Letter entrance animation; input is blocked while it plays
    pub letter_settle: Duration,
    /// Correct-answer effect before the next letter appears
    pub correct: Duration,
    /// How long a wrong-answer message stays visible
    pub wrong_feedback: Duration,
    /// Stage celebration before the next stage starts
    pub celebration: Duration,
}

impl Timings {
    /// Scale every delay by `factor` (2.0 plays twice as fast)
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |d: Duration| d.div_f64(factor);
        Timings {
            letter_settle: scale(self.letter_settle),
            correct: scale(self.correct),
            wrong_feedback: scale(self.wrong_feedback),
            celebration: scale(self.celebration),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            letter_settle: Duration::from_millis(500),
            correct: Duration::from_millis(1000),
            wrong_feedback: Duration::from_millis(2000),
            celebration: Duration::from_millis(3000),
        }
    }
}

/// Everything a session needs before the terminal is taken over
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub stages: StageTable,
    pub timings: Timings,
    pub presentation: PresentationMode,
    pub sound: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            stages: StageTable::alphabet(),
            timings: Timings::default(),
            presentation: PresentationMode::Auto,
            sound: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_speeds_up_all_delays() {
        let fast = Timings::default().scaled(2.0);
        assert_eq!(fast.letter_settle, Duration::from_millis(250));
        assert_eq!(fast.correct, Duration::from_millis(500));
        assert_eq!(fast.wrong_feedback, Duration::from_millis(1000));
        assert_eq!(fast.celebration, Duration::from_millis(1500));
    }

    #[test]
    fn test_default_config_uses_alphabet() {
        let config = GameConfig::default();
        assert_eq!(config.stages.len(), 5);
        assert_eq!(config.presentation, PresentationMode::Auto);
        assert!(config.sound);
    }
}
