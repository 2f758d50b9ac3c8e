//! Playoff seeding via the NFL tiebreaker cascade.
//!
//! Teams are ranked 1..16 within each conference:
//! 1. Division winners take ranks 1-4 (ordered by the conference cascade)
//! 2. Wild cards take ranks 5-7
//! 3. Non-playoff teams take ranks 8-16
//!
//! Within each group the cascade is:
//! 1. Winning percentage
//! 2. Head-to-head (sweep honored for groups of three or more)
//! 3. Division record
//! 4. Common games record (minimum four common opponents)
//! 5. Conference record
//! 6. Strength of victory
//! 7. Strength of schedule
//! 8. Team id (deterministic last resort)
//!
//! The cascade runs as a state machine over (tied set, step): a step either
//! isolates a single best team, which is selected, or the full tied set
//! advances to the next step. After every selection the cascade restarts
//! from step 1 on the shrunken pool.

use serde::{Deserialize, Serialize};

use crate::league::League;
use crate::standings::TeamRecord;
use crate::team::{Conference, Division, TeamId, TEAMS_PER_CONFERENCE};

/// A single tiebreaker step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TiebreakStep {
    WinPct,
    HeadToHead,
    DivisionRecord,
    CommonGames,
    ConferenceRecord,
    StrengthOfVictory,
    StrengthOfSchedule,
    TeamOrder,
}

/// Steps applied to a group tied on winning percentage, in order.
const TIEBREAK_ORDER: [TiebreakStep; 7] = [
    TiebreakStep::HeadToHead,
    TiebreakStep::DivisionRecord,
    TiebreakStep::CommonGames,
    TiebreakStep::ConferenceRecord,
    TiebreakStep::StrengthOfVictory,
    TiebreakStep::StrengthOfSchedule,
    TiebreakStep::TeamOrder,
];

/// Minimum common opponents for the common-games step to apply.
const COMMON_OPPONENT_FLOOR: usize = 4;

/// One selection made by the cascade: who, on which step, out of which
/// tied set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDecision {
    pub selected: TeamId,
    pub step: TiebreakStep,
    pub tied: Vec<TeamId>,
}

/// Ordered log of every cascade decision for one conference.
pub type SeedTrace = Vec<SeedDecision>;

/// Which cascade is running. The division cascade always applies the
/// division-record step; the conference cascade applies it only when the
/// whole tied set shares a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CascadeKind {
    Division,
    Conference,
}

struct Cascade<'a> {
    league: &'a League,
    records: &'a [TeamRecord],
    kind: CascadeKind,
}

impl<'a> Cascade<'a> {
    /// Select the best team from `pool`, recording the deciding step.
    fn select(&self, pool: &[TeamId]) -> SeedDecision {
        debug_assert!(!pool.is_empty());

        // Step 1: winning percentage over the whole pool.
        let best_pct = pool
            .iter()
            .map(|t| self.records[t.index()].win_pct())
            .fold(f64::MIN, f64::max);
        let tied: Vec<TeamId> = pool
            .iter()
            .copied()
            .filter(|t| self.records[t.index()].win_pct() == best_pct)
            .collect();

        if let [only] = tied[..] {
            return SeedDecision {
                selected: only,
                step: TiebreakStep::WinPct,
                tied,
            };
        }

        // Steps 2-8 run on the full tied set until one isolates a leader.
        for step in TIEBREAK_ORDER {
            let Some(metrics) = self.step_metrics(step, &tied) else {
                continue;
            };
            let best = metrics.iter().copied().fold(f64::MIN, f64::max);
            let leaders: Vec<TeamId> = tied
                .iter()
                .zip(&metrics)
                .filter(|(_, &m)| m == best)
                .map(|(&t, _)| t)
                .collect();
            if let [only] = leaders[..] {
                return SeedDecision {
                    selected: only,
                    step,
                    tied,
                };
            }
        }

        unreachable!("team-order step is total");
    }

    /// Per-team metric for one step, or `None` when the step is skipped.
    /// Higher is better for every step.
    fn step_metrics(&self, step: TiebreakStep, tied: &[TeamId]) -> Option<Vec<f64>> {
        match step {
            TiebreakStep::WinPct => {
                Some(tied.iter().map(|t| self.records[t.index()].win_pct()).collect())
            }
            TiebreakStep::HeadToHead => Some(self.head_to_head_metrics(tied)),
            TiebreakStep::DivisionRecord => {
                if self.kind == CascadeKind::Conference && !self.same_division(tied) {
                    return None;
                }
                Some(
                    tied.iter()
                        .map(|t| self.records[t.index()].division_pct())
                        .collect(),
                )
            }
            TiebreakStep::CommonGames => {
                let common = self.common_opponents(tied);
                if common.len() < COMMON_OPPONENT_FLOOR {
                    return None;
                }
                Some(
                    tied.iter()
                        .map(|t| self.records[t.index()].record_vs(&common).pct())
                        .collect(),
                )
            }
            TiebreakStep::ConferenceRecord => Some(
                tied.iter()
                    .map(|t| self.records[t.index()].conference_pct())
                    .collect(),
            ),
            TiebreakStep::StrengthOfVictory => Some(
                tied.iter()
                    .map(|t| self.records[t.index()].strength_of_victory)
                    .collect(),
            ),
            TiebreakStep::StrengthOfSchedule => Some(
                tied.iter()
                    .map(|t| self.records[t.index()].strength_of_schedule)
                    .collect(),
            ),
            TiebreakStep::TeamOrder => {
                Some(tied.iter().map(|t| -(t.0 as f64)).collect())
            }
        }
    }

    /// Head-to-head metric. For groups of three or more a sweep (beat every
    /// other tied team, never lost or tied to any) outranks any percentage;
    /// otherwise the combined head-to-head percentage over the tied set.
    fn head_to_head_metrics(&self, tied: &[TeamId]) -> Vec<f64> {
        tied.iter()
            .map(|&t| {
                let record = &self.records[t.index()];
                let others: Vec<TeamId> =
                    tied.iter().copied().filter(|&o| o != t).collect();
                if tied.len() > 2 && others.iter().all(|&o| record.swept(o)) {
                    2.0
                } else {
                    record.head_to_head_pct(&others)
                }
            })
            .collect()
    }

    /// Opponents faced by every member of the tied set, the tied teams
    /// themselves excluded.
    fn common_opponents(&self, tied: &[TeamId]) -> Vec<TeamId> {
        let mut common: Option<Vec<TeamId>> = None;
        for &t in tied {
            let mut faced: Vec<TeamId> = self.records[t.index()]
                .opponents
                .iter()
                .copied()
                .filter(|o| !tied.contains(o))
                .collect();
            faced.sort();
            faced.dedup();
            common = Some(match common {
                None => faced,
                Some(prev) => prev.into_iter().filter(|o| faced.contains(o)).collect(),
            });
        }
        common.unwrap_or_default()
    }

    fn same_division(&self, tied: &[TeamId]) -> bool {
        let mut divisions = tied
            .iter()
            .filter_map(|&t| self.league.get(t).map(|team| team.division));
        match divisions.next() {
            Some(first) => divisions.all(|d| d == first),
            None => false,
        }
    }

    /// Fully order a pool by iterated selection, restarting the cascade
    /// after every pick.
    fn rank(&self, pool: &[TeamId], trace: &mut SeedTrace) -> Vec<TeamId> {
        let mut remaining = pool.to_vec();
        let mut ordered = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let decision = self.select(&remaining);
            remaining.retain(|&t| t != decision.selected);
            ordered.push(decision.selected);
            trace.push(decision);
        }
        ordered
    }
}

/// Final seeding of one conference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceSeeding {
    pub conference: Conference,
    /// The 16 teams in seed order; index 0 is seed 1.
    pub order: Vec<TeamId>,
    /// The four division winners, in seed order (seeds 1-4).
    pub division_winners: Vec<TeamId>,
    /// Every cascade decision, in the order it was made.
    pub trace: SeedTrace,
}

impl ConferenceSeeding {
    /// Seeds 1..=7 make the playoffs.
    pub const PLAYOFF_SEEDS: u8 = 7;

    /// 1-based seed of a team, `None` if the team is not in this conference.
    pub fn seed_of(&self, team: TeamId) -> Option<u8> {
        self.order
            .iter()
            .position(|&t| t == team)
            .map(|i| (i + 1) as u8)
    }

    pub fn is_division_winner(&self, team: TeamId) -> bool {
        self.division_winners.contains(&team)
    }

    /// The three wild cards, in seed order (seeds 5-7).
    pub fn wild_cards(&self) -> &[TeamId] {
        &self.order[4..7]
    }
}

/// Seeding of both conferences for one season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSeeding {
    pub afc: ConferenceSeeding,
    pub nfc: ConferenceSeeding,
}

impl SeasonSeeding {
    pub fn conference(&self, conference: Conference) -> &ConferenceSeeding {
        match conference {
            Conference::Afc => &self.afc,
            Conference::Nfc => &self.nfc,
        }
    }

    /// 1-based seed within the team's own conference.
    pub fn seed_of(&self, team: TeamId) -> Option<u8> {
        self.afc.seed_of(team).or_else(|| self.nfc.seed_of(team))
    }

    pub fn is_division_winner(&self, team: TeamId) -> bool {
        self.afc.is_division_winner(team) || self.nfc.is_division_winner(team)
    }
}

/// Rank the 16 teams of one conference.
pub fn seed_conference(
    league: &League,
    records: &[TeamRecord],
    conference: Conference,
) -> ConferenceSeeding {
    let mut trace = SeedTrace::new();
    let division_cascade = Cascade {
        league,
        records,
        kind: CascadeKind::Division,
    };
    let conference_cascade = Cascade {
        league,
        records,
        kind: CascadeKind::Conference,
    };

    // Step B: one winner per division, picked by the division cascade.
    let mut winners = Vec::with_capacity(4);
    for division in Division::in_conference(conference) {
        let members = league.division_members(division);
        let decision = division_cascade.select(&members);
        winners.push(decision.selected);
        trace.push(decision);
    }

    // Ranks 1-4: division winners ordered by the conference cascade.
    let mut order = conference_cascade.rank(&winners, &mut trace);
    let division_winners = order.clone();

    // Steps C and D: wild cards then non-playoff teams, iteratively.
    let rest: Vec<TeamId> = league
        .conference_members(conference)
        .into_iter()
        .filter(|t| !division_winners.contains(t))
        .collect();
    order.extend(conference_cascade.rank(&rest, &mut trace));

    debug_assert_eq!(order.len(), TEAMS_PER_CONFERENCE);

    ConferenceSeeding {
        conference,
        order,
        division_winners,
        trace,
    }
}

/// Seed both conferences.
pub fn season_seeding(league: &League, records: &[TeamRecord]) -> SeasonSeeding {
    SeasonSeeding {
        afc: seed_conference(league, records, Conference::Afc),
        nfc: seed_conference(league, records, Conference::Nfc),
    }
}
