//! Local preferences persisted on the device.

use serde::{Deserialize, Serialize};

/// User preferences stored in the local key-value store under `settings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Daily reading goal in minutes
    pub daily_goal_minutes: u32,
    /// Local time for the reading reminder, `HH:MM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    /// Preferred content language (BCP 47)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    /// Push finished sessions to the feed
    pub share_sessions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal_minutes: 20,
            reminder_time: None,
            preferred_language: None,
            share_sessions: true,
        }
    }
}

impl Settings {
    /// Fraction of the daily goal reached by `minutes_today`, in `[0, 1]`.
    pub fn goal_progress(&self, minutes_today: u32) -> f64 {
        if self.daily_goal_minutes == 0 {
            return 1.0;
        }
        (f64::from(minutes_today) / f64::from(self.daily_goal_minutes)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;

    #[test]
    fn test_goal_progress() {
        let settings = Settings::default();
        assert_eq!(settings.goal_progress(10), 0.5);
        assert_eq!(settings.goal_progress(45), 1.0);

        let no_goal = Settings { daily_goal_minutes: 0, ..Settings::default() };
        assert_eq!(no_goal.goal_progress(0), 1.0);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let s: Settings = serde_json::from_str(r#"{"daily_goal_minutes": 45}"#)
            .unwrap_or_else(|e| panic!("decode failed: {e}"));
        assert_eq!(s.daily_goal_minutes, 45);
        assert!(s.share_sessions);
    }

    #[test]
    fn test_round_trip() {
        let full = Settings {
            daily_goal_minutes: 45,
            reminder_time: Some("21:30".to_string()),
            preferred_language: Some("pt-BR".to_string()),
            share_sessions: false,
        };
        assert_eq!(round_trip(&full), full);
        assert_eq!(round_trip(&Settings::default()), Settings::default());
    }
}
