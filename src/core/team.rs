//! Teams (character types) and alignments.

use serde::{Deserialize, Serialize};

/// The character type a role belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Townsfolk,
    Outsider,
    Minion,
    Demon,
    Traveller,
}

impl Team {
    /// Every team, in display order.
    pub const ALL: [Team; 5] = [
        Team::Townsfolk,
        Team::Outsider,
        Team::Minion,
        Team::Demon,
        Team::Traveller,
    ];

    /// The alignment a player of this team starts with.
    ///
    /// Travellers are seated good unless the narrator says otherwise.
    #[must_use]
    pub const fn default_alignment(self) -> Alignment {
        match self {
            Team::Townsfolk | Team::Outsider | Team::Traveller => Alignment::Good,
            Team::Minion | Team::Demon => Alignment::Evil,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Team::Townsfolk => "townsfolk",
            Team::Outsider => "outsider",
            Team::Minion => "minion",
            Team::Demon => "demon",
            Team::Traveller => "traveller",
        };
        f.write_str(name)
    }
}

/// Which side a player plays for. The winner of a game is an alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Good,
    Evil,
}

impl Alignment {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Alignment::Good => Alignment::Evil,
            Alignment::Evil => Alignment::Good,
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Good => f.write_str("good"),
            Alignment::Evil => f.write_str("evil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alignment() {
        assert_eq!(Team::Townsfolk.default_alignment(), Alignment::Good);
        assert_eq!(Team::Outsider.default_alignment(), Alignment::Good);
        assert_eq!(Team::Minion.default_alignment(), Alignment::Evil);
        assert_eq!(Team::Demon.default_alignment(), Alignment::Evil);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Alignment::Good.opposite(), Alignment::Evil);
        assert_eq!(Alignment::Evil.opposite(), Alignment::Good);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Team::Demon).unwrap(), "\"demon\"");
        let team: Team = serde_json::from_str("\"minion\"").unwrap();
        assert_eq!(team, Team::Minion);
    }
}
