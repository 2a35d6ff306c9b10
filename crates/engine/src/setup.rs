use crate::{
    error::{Error, Result},
    store::{LocalCache, PLAYER_NAME_KEY, SELECTED_SPORT_KEY},
};
use model::Sport;
use serde::Serialize;
use std::sync::Arc;

/// A validated name and sport, ready to start a session with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerSetup {
    pub name: Box<str>,
    #[serde(serialize_with = "serialize_sport_id")]
    pub sport: &'static Sport,
}

fn serialize_sport_id<S>(sport: &&'static Sport, serializer: S) -> core::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(sport.id)
}

impl PlayerSetup {
    /// Trims the name and resolves the sport, rejecting blank names and unknown sports.
    pub fn validate(name: &str, sport: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        let sport = Sport::find(sport.trim()).ok_or(Error::UnknownSport)?;
        Ok(Self { name: name.into(), sport })
    }
}

/// Remembers the player's choices between the setup screen and the game screen.
#[derive(Clone)]
pub struct Setup {
    cache: Arc<dyn LocalCache>,
}

impl Setup {
    pub fn new(cache: Arc<dyn LocalCache>) -> Self {
        Self { cache }
    }

    pub fn save(&self, name: &str, sport: &str) -> Result<PlayerSetup> {
        let setup = PlayerSetup::validate(name, sport)?;
        self.cache.set(PLAYER_NAME_KEY, String::from(setup.name.as_ref()));
        self.cache.set(SELECTED_SPORT_KEY, String::from(setup.sport.id));
        Ok(setup)
    }

    /// The last saved setup, if both halves are present and still valid.
    pub fn load(&self) -> Option<PlayerSetup> {
        let name = self.cache.get(PLAYER_NAME_KEY)?;
        let sport = self.cache.get(SELECTED_SPORT_KEY)?;
        PlayerSetup::validate(&name, &sport).ok()
    }
}
