//! Season standings: per-team records, head-to-head tallies, and
//! strength-of-victory / strength-of-schedule.

use serde::{Deserialize, Serialize};

use crate::league::League;
use crate::team::{TeamId, NUM_TEAMS};

/// A finished game as the seeding layer sees it: participants and winner.
/// Covers both real completed games and simulated ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeasonGame {
    pub game_id: u32,
    pub home: TeamId,
    pub visiting: TeamId,
    /// `None` for a tie.
    pub winner: Option<TeamId>,
}

impl SeasonGame {
    pub fn new(game_id: u32, home: TeamId, visiting: TeamId, winner: Option<TeamId>) -> Self {
        Self {
            game_id,
            home,
            visiting,
            winner,
        }
    }
}

/// Win-loss-tie tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u16,
    pub losses: u16,
    pub ties: u16,
}

impl Tally {
    pub fn games(&self) -> u16 {
        self.wins + self.losses + self.ties
    }

    /// Winning percentage counting ties as half a win; 0 with no games.
    pub fn pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / games as f64
    }

    fn add(&mut self, won: Option<bool>) {
        match won {
            Some(true) => self.wins += 1,
            Some(false) => self.losses += 1,
            None => self.ties += 1,
        }
    }
}

/// One team's full-season record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: TeamId,
    pub overall: Tally,
    pub division: Tally,
    pub conference: Tally,
    /// Head-to-head tally against each opponent, indexed by `TeamId`.
    pub head_to_head: Vec<Tally>,
    /// Every opponent faced, with repeats for rematches.
    pub opponents: Vec<TeamId>,
    /// Every opponent beaten, with repeats.
    pub beaten: Vec<TeamId>,
    /// Strength of victory: average winning percentage of beaten opponents.
    pub strength_of_victory: f64,
    /// Strength of schedule: average winning percentage of all opponents.
    pub strength_of_schedule: f64,
}

impl TeamRecord {
    fn new(team: TeamId) -> Self {
        Self {
            team,
            overall: Tally::default(),
            division: Tally::default(),
            conference: Tally::default(),
            head_to_head: vec![Tally::default(); NUM_TEAMS],
            opponents: Vec::new(),
            beaten: Vec::new(),
            strength_of_victory: 0.0,
            strength_of_schedule: 0.0,
        }
    }

    pub fn win_pct(&self) -> f64 {
        self.overall.pct()
    }

    pub fn division_pct(&self) -> f64 {
        self.division.pct()
    }

    pub fn conference_pct(&self) -> f64 {
        self.conference.pct()
    }

    /// Combined head-to-head percentage against a set of opponents.
    pub fn head_to_head_pct(&self, opponents: &[TeamId]) -> f64 {
        let mut combined = Tally::default();
        for &opp in opponents {
            let t = &self.head_to_head[opp.index()];
            combined.wins += t.wins;
            combined.losses += t.losses;
            combined.ties += t.ties;
        }
        combined.pct()
    }

    /// Whether this team beat `opponent` at least once and never lost or
    /// tied against them.
    pub fn swept(&self, opponent: TeamId) -> bool {
        let t = &self.head_to_head[opponent.index()];
        t.wins > 0 && t.losses == 0 && t.ties == 0
    }

    /// Record over games against a set of common opponents.
    pub fn record_vs(&self, opponents: &[TeamId]) -> Tally {
        let mut combined = Tally::default();
        for &opp in opponents {
            let t = &self.head_to_head[opp.index()];
            combined.wins += t.wins;
            combined.losses += t.losses;
            combined.ties += t.ties;
        }
        combined
    }
}

/// Standings input error: the season games disagree with the league or
/// with themselves. Always fatal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StandingsError {
    #[error("Game {game_id} references unknown team {team:?}")]
    UnknownTeam { game_id: u32, team: TeamId },

    #[error("Game {game_id} lists winner {winner:?} which is not a participant")]
    WinnerNotInGame { game_id: u32, winner: TeamId },
}

/// Build the 32 per-team season records from a season's finished games.
pub fn build_records(
    league: &League,
    games: &[SeasonGame],
) -> Result<Vec<TeamRecord>, StandingsError> {
    let mut records: Vec<TeamRecord> = (0..NUM_TEAMS as u8)
        .map(|i| TeamRecord::new(TeamId(i)))
        .collect();

    for game in games {
        let home = league.get(game.home).ok_or(StandingsError::UnknownTeam {
            game_id: game.game_id,
            team: game.home,
        })?;
        let visiting = league
            .get(game.visiting)
            .ok_or(StandingsError::UnknownTeam {
                game_id: game.game_id,
                team: game.visiting,
            })?;
        if let Some(winner) = game.winner {
            if winner != game.home && winner != game.visiting {
                return Err(StandingsError::WinnerNotInGame {
                    game_id: game.game_id,
                    winner,
                });
            }
        }

        let same_division = home.division == visiting.division;
        let same_conference = home.conference == visiting.conference;

        for (me, them) in [(game.home, game.visiting), (game.visiting, game.home)] {
            let won = game.winner.map(|w| w == me);
            let record = &mut records[me.index()];
            record.overall.add(won);
            if same_division {
                record.division.add(won);
            }
            if same_conference {
                record.conference.add(won);
            }
            record.head_to_head[them.index()].add(won);
            record.opponents.push(them);
            if won == Some(true) {
                record.beaten.push(them);
            }
        }
    }

    // Strength metrics need the finished record table.
    let pcts: Vec<f64> = records.iter().map(|r| r.win_pct()).collect();
    for record in &mut records {
        record.strength_of_victory = average_pct(&record.beaten, &pcts);
        record.strength_of_schedule = average_pct(&record.opponents, &pcts);
    }

    Ok(records)
}

fn average_pct(teams: &[TeamId], pcts: &[f64]) -> f64 {
    if teams.is_empty() {
        return 0.0;
    }
    teams.iter().map(|t| pcts[t.index()]).sum::<f64>() / teams.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::fixtures::test_league;

    fn game(game_id: u32, home: u8, visiting: u8, winner: Option<u8>) -> SeasonGame {
        SeasonGame::new(game_id, TeamId(home), TeamId(visiting), winner.map(TeamId))
    }

    #[test]
    fn test_overall_record() {
        let league = test_league();
        // Team 0 beats 1 and 2, loses to 3, ties 4.
        let games = vec![
            game(1, 0, 1, Some(0)),
            game(2, 2, 0, Some(0)),
            game(3, 0, 3, Some(3)),
            game(4, 4, 0, None),
        ];
        let records = build_records(&league, &games).unwrap();
        let r = &records[0];
        assert_eq!(r.overall, Tally { wins: 2, losses: 1, ties: 1 });
        assert!((r.win_pct() - 2.5 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_division_and_conference_split() {
        let league = test_league();
        // Teams 0-3 share a division; team 4 is AFC North, team 16 is NFC.
        let games = vec![
            game(1, 0, 1, Some(0)),  // division game
            game(2, 0, 4, Some(0)),  // conference game, not division
            game(3, 0, 16, Some(16)), // interconference game
        ];
        let records = build_records(&league, &games).unwrap();
        let r = &records[0];
        assert_eq!(r.division.games(), 1);
        assert_eq!(r.conference.games(), 2);
        assert_eq!(r.overall.games(), 3);
        assert_eq!(r.division.wins, 1);
        assert_eq!(r.conference.wins, 2);
        assert_eq!(r.overall.losses, 1);
    }

    #[test]
    fn test_head_to_head_and_sweep() {
        let league = test_league();
        let games = vec![
            game(1, 0, 1, Some(0)),
            game(2, 1, 0, Some(0)),
            game(3, 0, 2, Some(2)),
        ];
        let records = build_records(&league, &games).unwrap();
        let r = &records[0];
        assert!(r.swept(TeamId(1)));
        assert!(!r.swept(TeamId(2)));
        assert_eq!(r.head_to_head[1].wins, 2);
        assert!((r.head_to_head_pct(&[TeamId(1), TeamId(2)]) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_strength_metrics() {
        let league = test_league();
        // 0 beats 1; 1 beats 2; 2 beats 3.
        let games = vec![
            game(1, 0, 1, Some(0)),
            game(2, 1, 2, Some(1)),
            game(3, 2, 3, Some(2)),
        ];
        let records = build_records(&league, &games).unwrap();
        // Team 1 finished 1-1 => pct 0.5; team 0 beat only team 1.
        assert!((records[0].strength_of_victory - 0.5).abs() < 1e-12);
        assert!((records[0].strength_of_schedule - 0.5).abs() < 1e-12);
        // Team with no games has zero strengths.
        assert_eq!(records[31].strength_of_victory, 0.0);
        assert_eq!(records[31].strength_of_schedule, 0.0);
    }
}
