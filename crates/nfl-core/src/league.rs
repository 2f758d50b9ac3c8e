//! League roster and validation.

use serde::{Deserialize, Serialize};

use crate::team::{Conference, Division, Team, TeamId, NUM_TEAMS};

/// The 32-team league. Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub teams: Vec<Team>,
}

impl League {
    /// Teams per division.
    pub const TEAMS_PER_DIVISION: usize = 4;

    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    /// Get a team by id.
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Find a team by full name or short code (case-insensitive).
    pub fn find(&self, query: &str) -> Option<&Team> {
        let query = query.to_lowercase();
        self.teams
            .iter()
            .find(|t| t.code.to_lowercase() == query || t.name.to_lowercase() == query)
    }

    /// Teams in a division, in id order.
    pub fn division_members(&self, division: Division) -> Vec<TeamId> {
        let mut members: Vec<TeamId> = self
            .teams
            .iter()
            .filter(|t| t.division == division)
            .map(|t| t.id)
            .collect();
        members.sort();
        members
    }

    /// Teams in a conference, in id order.
    pub fn conference_members(&self, conference: Conference) -> Vec<TeamId> {
        let mut members: Vec<TeamId> = self
            .teams
            .iter()
            .filter(|t| t.conference == conference)
            .map(|t| t.id)
            .collect();
        members.sort();
        members
    }

    /// Validate league structure.
    pub fn validate(&self) -> Result<(), LeagueError> {
        if self.teams.len() != NUM_TEAMS {
            return Err(LeagueError::InvalidTeamCount(self.teams.len()));
        }

        let mut seen = std::collections::HashSet::new();
        for team in &self.teams {
            if team.id.index() >= NUM_TEAMS {
                return Err(LeagueError::IdOutOfRange(team.id));
            }
            if !seen.insert(team.id) {
                return Err(LeagueError::DuplicateTeam(team.id));
            }
            if team.conference != team.division.conference() {
                return Err(LeagueError::ConferenceMismatch(team.id));
            }
        }

        for division in Division::ALL {
            let count = self.teams.iter().filter(|t| t.division == division).count();
            if count != Self::TEAMS_PER_DIVISION {
                return Err(LeagueError::InvalidDivisionSize(division, count));
            }
        }

        Ok(())
    }
}

/// League configuration error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LeagueError {
    #[error("Invalid team count: expected 32, got {0}")]
    InvalidTeamCount(usize),

    #[error("Team id out of range: {0:?}")]
    IdOutOfRange(TeamId),

    #[error("Duplicate team id: {0:?}")]
    DuplicateTeam(TeamId),

    #[error("Team {0:?} conference does not match its division")]
    ConferenceMismatch(TeamId),

    #[error("Division {0} has {1} teams, expected 4")]
    InvalidDivisionSize(Division, usize),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A synthetic 32-team league: four teams per division, ids assigned
    /// division by division in `Division::ALL` order.
    pub fn test_league() -> League {
        let mut teams = Vec::with_capacity(NUM_TEAMS);
        for (d, division) in Division::ALL.into_iter().enumerate() {
            for slot in 0..4 {
                let id = TeamId((d * 4 + slot) as u8);
                teams.push(Team::new(
                    id,
                    format!("Team {}", id.0),
                    format!("T{:02}", id.0),
                    division,
                ));
            }
        }
        League::new(teams)
    }
}
