//! Team, conference, and division types.

use serde::{Deserialize, Serialize};

/// Number of teams in the league.
pub const NUM_TEAMS: usize = 32;

/// Teams per conference.
pub const TEAMS_PER_CONFERENCE: usize = 16;

/// Unique identifier for a team (0-31 for 32 teams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl TeamId {
    /// Index into a 32-slot per-team table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self(0)
    }
}

/// NFL conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conference {
    Afc,
    Nfc,
}

impl Conference {
    /// Both conferences, in seeding order.
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];
}

impl std::fmt::Display for Conference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conference::Afc => write!(f, "AFC"),
            Conference::Nfc => write!(f, "NFC"),
        }
    }
}

/// NFL division. Membership is immutable within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    #[serde(rename = "AFC East")]
    AfcEast,
    #[serde(rename = "AFC North")]
    AfcNorth,
    #[serde(rename = "AFC South")]
    AfcSouth,
    #[serde(rename = "AFC West")]
    AfcWest,
    #[serde(rename = "NFC East")]
    NfcEast,
    #[serde(rename = "NFC North")]
    NfcNorth,
    #[serde(rename = "NFC South")]
    NfcSouth,
    #[serde(rename = "NFC West")]
    NfcWest,
}

impl Division {
    /// All eight divisions.
    pub const ALL: [Division; 8] = [
        Division::AfcEast,
        Division::AfcNorth,
        Division::AfcSouth,
        Division::AfcWest,
        Division::NfcEast,
        Division::NfcNorth,
        Division::NfcSouth,
        Division::NfcWest,
    ];

    /// The conference this division belongs to.
    pub fn conference(self) -> Conference {
        match self {
            Division::AfcEast | Division::AfcNorth | Division::AfcSouth | Division::AfcWest => {
                Conference::Afc
            }
            Division::NfcEast | Division::NfcNorth | Division::NfcSouth | Division::NfcWest => {
                Conference::Nfc
            }
        }
    }

    /// The four divisions of a conference.
    pub fn in_conference(conference: Conference) -> [Division; 4] {
        match conference {
            Conference::Afc => [
                Division::AfcEast,
                Division::AfcNorth,
                Division::AfcSouth,
                Division::AfcWest,
            ],
            Conference::Nfc => [
                Division::NfcEast,
                Division::NfcNorth,
                Division::NfcSouth,
                Division::NfcWest,
            ],
        }
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Division::AfcEast => "AFC East",
            Division::AfcNorth => "AFC North",
            Division::AfcSouth => "AFC South",
            Division::AfcWest => "AFC West",
            Division::NfcEast => "NFC East",
            Division::NfcNorth => "NFC North",
            Division::NfcSouth => "NFC South",
            Division::NfcWest => "NFC West",
        };
        write!(f, "{}", name)
    }
}

/// A club with its league placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: TeamId,
    /// Full team name (e.g., "Kansas City Chiefs")
    pub name: String,
    /// Short code (e.g., "KC")
    pub code: String,
    /// Conference
    pub conference: Conference,
    /// Division
    pub division: Division,
}

impl Team {
    /// Create a new team with the given parameters.
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        code: impl Into<String>,
        division: Division,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            conference: division.conference(),
            division,
        }
    }
}
