use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The player name is blank after trimming.
    EmptyName,
    /// No sport was selected or the selection is not one we have questions for.
    UnknownSport,
    /// The difficulty is not one of the tiers of the session's sport.
    UnknownDifficulty,
    UnknownMode,
    /// The session does not exist or has already been discarded.
    UnknownSession,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmptyName => "Please enter your name.",
            Self::UnknownSport => "Please select a sport.",
            Self::UnknownDifficulty => "That difficulty is not available for this sport.",
            Self::UnknownMode => "Unknown game mode.",
            Self::UnknownSession => "Game not found. It may have already expired.",
        })
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
