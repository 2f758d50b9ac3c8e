//! Aggregation of scenario outcomes into per-team forecasts.

use serde::{Deserialize, Serialize};

use nfl_core::{TeamId, NUM_TEAMS};

use crate::engine::ScenarioOutcome;

/// z for a 95% interval.
const Z_95: f64 = 1.96;

/// Seeds 1..=7 make the playoffs.
const PLAYOFF_SEED_CUTOFF: u8 = 7;

/// A point estimate with a 95% interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntervalEstimate {
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Per-team aggregated forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamForecast {
    pub team: TeamId,
    /// P(seed <= 7), Wilson interval.
    pub playoff: IntervalEstimate,
    /// P(seed == 1), Wilson interval.
    pub bye: IntervalEstimate,
    /// Mean wins, 2.5/97.5 empirical percentiles.
    pub wins: IntervalEstimate,
    /// Mean seed, 2.5/97.5 empirical percentiles.
    pub seed: IntervalEstimate,
}

/// Forecast across all completed scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub requested_scenarios: u32,
    /// Number of scenarios actually aggregated; below `requested_scenarios`
    /// after a cancellation.
    pub completed_scenarios: u32,
    /// One forecast per team, indexed by `TeamId`.
    pub teams: Vec<TeamForecast>,
}

impl ForecastSummary {
    /// Reduce scenario outcomes. Commutative and associative over the
    /// outcome list: order never changes the result.
    pub fn from_outcomes(outcomes: &[ScenarioOutcome], requested_scenarios: u32) -> Self {
        let n = outcomes.len();

        let teams = (0..NUM_TEAMS as u8)
            .map(|i| {
                let team = TeamId(i);
                let mut playoff_hits = 0u32;
                let mut bye_hits = 0u32;
                let mut wins: Vec<f64> = Vec::with_capacity(n);
                let mut seeds: Vec<f64> = Vec::with_capacity(n);

                for outcome in outcomes {
                    let line = outcome.line(team);
                    if line.seed <= PLAYOFF_SEED_CUTOFF {
                        playoff_hits += 1;
                    }
                    if line.seed == 1 {
                        bye_hits += 1;
                    }
                    wins.push(line.wins as f64 + 0.5 * line.ties as f64);
                    seeds.push(line.seed as f64);
                }

                TeamForecast {
                    team,
                    playoff: bernoulli_estimate(playoff_hits, n),
                    bye: bernoulli_estimate(bye_hits, n),
                    wins: empirical_estimate(&mut wins),
                    seed: empirical_estimate(&mut seeds),
                }
            })
            .collect();

        Self {
            requested_scenarios,
            completed_scenarios: n as u32,
            teams,
        }
    }

    pub fn team(&self, team: TeamId) -> &TeamForecast {
        &self.teams[team.index()]
    }
}

fn bernoulli_estimate(hits: u32, n: usize) -> IntervalEstimate {
    if n == 0 {
        return IntervalEstimate {
            estimate: 0.0,
            lower: 0.0,
            upper: 0.0,
        };
    }
    let p = hits as f64 / n as f64;
    let (lower, upper) = wilson_interval(p, n as f64, Z_95);
    IntervalEstimate {
        estimate: p,
        lower,
        upper,
    }
}

fn empirical_estimate(values: &mut [f64]) -> IntervalEstimate {
    if values.is_empty() {
        return IntervalEstimate {
            estimate: 0.0,
            lower: 0.0,
            upper: 0.0,
        };
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    IntervalEstimate {
        estimate: mean,
        lower: percentile(values, 0.025),
        upper: percentile(values, 0.975),
    }
}

/// Wilson score interval for a Bernoulli proportion. Well-formed at p of
/// 0 or 1, unlike the normal approximation.
pub fn wilson_interval(p: f64, n: f64, z: f64) -> (f64, f64) {
    let denominator = 1.0 + z * z / n;
    let center = p + z * z / (2.0 * n);
    let margin = z * (p * (1.0 - p) / n + z * z / (4.0 * n * n)).sqrt();
    ((center - margin) / denominator, (center + margin) / denominator)
}

/// Empirical percentile of sorted values, linearly interpolated.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    if low == high {
        sorted[low]
    } else {
        let weight = position - low as f64;
        sorted[low] * (1.0 - weight) + sorted[high] * weight
    }
}
