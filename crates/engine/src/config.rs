use crate::error::Error;
use core::{str::FromStr, time::Duration};
use serde::Serialize;

/// How the difficulty of each question is decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Every question comes from the first tier of the sport, drawn automatically.
    FixedDifficulty,
    /// The player picks a tier before every question.
    PlayerChooses,
}

/// How many points a correct answer is worth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Scoring {
    /// One point per correct answer.
    Flat,
    /// The difficulty of the question in points.
    Weighted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub scoring: Scoring,
    /// Length of a session in ticks.
    pub session_secs: u32,
    /// Interval between two ticks of the countdown.
    pub tick: Duration,
    /// How long the verdict is shown before moving on to the next question.
    pub feedback_delay: Duration,
    /// How long a finished session stays queryable before it is discarded.
    pub linger: Duration,
}

impl Config {
    /// One-minute sessions on a preset difficulty, one point per correct answer.
    pub const fn classic() -> Self {
        Self {
            mode: Mode::FixedDifficulty,
            scoring: Scoring::Flat,
            session_secs: 60,
            tick: Duration::from_secs(1),
            feedback_delay: Duration::from_secs(1),
            linger: Duration::from_secs(300),
        }
    }

    /// Three-minute sessions where the player picks the tier and scores its value.
    pub const fn challenge() -> Self {
        Self {
            mode: Mode::PlayerChooses,
            scoring: Scoring::Weighted,
            session_secs: 180,
            tick: Duration::from_secs(1),
            feedback_delay: Duration::from_secs(1),
            linger: Duration::from_secs(300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::classic()
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim() {
            "classic" => Ok(Self::classic()),
            "challenge" => Ok(Self::challenge()),
            _ => Err(Error::UnknownMode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Mode, Scoring};
    use crate::error::Error;

    #[test]
    fn parses_preset_names() {
        let classic: Config = "classic".parse().unwrap();
        assert_eq!(classic.mode, Mode::FixedDifficulty);
        assert_eq!(classic.scoring, Scoring::Flat);
        assert_eq!(classic.session_secs, 60);

        let challenge: Config = " challenge ".parse().unwrap();
        assert_eq!(challenge.mode, Mode::PlayerChooses);
        assert_eq!(challenge.scoring, Scoring::Weighted);
        assert_eq!(challenge.session_secs, 180);

        assert_eq!("arcade".parse::<Config>(), Err(Error::UnknownMode));
    }
}
