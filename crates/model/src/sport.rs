use serde::Serialize;

/// A difficulty tier within a sport. The value is both the filter key in the
/// question store and the number of points a correct answer is worth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub label: &'static str,
    pub value: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Sport {
    /// Category key used to filter questions.
    pub id: &'static str,
    pub name: &'static str,
    /// Available tiers in ascending order. Never empty.
    pub tiers: &'static [Tier],
}

pub static SPORTS: [Sport; 4] = [
    Sport {
        id: "basketball",
        name: "Basketball",
        tiers: &[Tier { label: "Two-Point Shot", value: 2 }, Tier { label: "Three-Point Shot", value: 3 }],
    },
    Sport {
        id: "football",
        name: "Football",
        tiers: &[Tier { label: "Field Goal", value: 3 }, Tier { label: "Touchdown", value: 7 }],
    },
    Sport { id: "soccer", name: "Soccer", tiers: &[Tier { label: "Goal", value: 1 }] },
    Sport {
        id: "baseball",
        name: "Baseball",
        tiers: &[
            Tier { label: "Single", value: 1 },
            Tier { label: "Double", value: 2 },
            Tier { label: "Triple", value: 3 },
            Tier { label: "Home Run", value: 4 },
        ],
    },
];

impl Sport {
    pub fn find(id: &str) -> Option<&'static Self> {
        SPORTS.iter().find(|sport| sport.id == id)
    }

    /// The tier drawn from when the player does not pick one.
    pub fn default_tier(&self) -> Tier {
        self.tiers[0]
    }

    pub fn has_tier(&self, value: u16) -> bool {
        self.tiers.iter().any(|tier| tier.value == value)
    }
}
