//! Per-game context adjustments: travel distance, altitude, and kickoff
//! slot. Each term penalizes the visiting side; the sum is a single
//! additive ELO number consumed by the rollforward and the simulator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ELO points per 1000 miles of visitor travel.
const TRAVEL_POINTS_PER_1000_MILES: f64 = -4.0;

/// Venue altitude above which the altitude penalty applies.
const ALTITUDE_THRESHOLD_FT: f64 = 4000.0;

/// Fixed visitor penalty at high-altitude venues.
const ALTITUDE_ADJUSTMENT: f64 = -10.0;

/// Visitor penalty on Thursday night (short week).
const THURSDAY_NIGHT_ADJUSTMENT: f64 = -5.0;

/// Mean Earth radius in miles, for great-circle distance.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Kickoff slot classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KickoffSlot {
    ThursdayNight,
    SundayNight,
    MondayNight,
    SundayAfternoon,
    Other,
}

impl KickoffSlot {
    /// Classify a kickoff from its weekday and local hour (24h clock).
    pub fn classify(weekday: &str, hour: u8) -> Self {
        match weekday {
            "Thursday" => KickoffSlot::ThursdayNight,
            "Monday" => KickoffSlot::MondayNight,
            "Sunday" if hour >= 20 => KickoffSlot::SundayNight,
            "Sunday" if (13..20).contains(&hour) => KickoffSlot::SundayAfternoon,
            _ => KickoffSlot::Other,
        }
    }

    /// Visitor adjustment for this slot. Only the short Thursday week
    /// carries a penalty.
    pub fn adjustment(self) -> f64 {
        match self {
            KickoffSlot::ThursdayNight => THURSDAY_NIGHT_ADJUSTMENT,
            _ => 0.0,
        }
    }
}

/// A stadium location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Venue {
    pub lat: f64,
    pub lon: f64,
    pub altitude_ft: f64,
}

impl Venue {
    pub fn new(lat: f64, lon: f64, altitude_ft: f64) -> Self {
        Self {
            lat,
            lon,
            altitude_ft,
        }
    }

    /// Great-circle distance to another venue, in miles.
    pub fn distance_miles(&self, other: &Venue) -> f64 {
        let (lat1, lon1) = (self.lat.to_radians(), self.lon.to_radians());
        let (lat2, lon2) = (other.lat.to_radians(), other.lon.to_radians());
        let dlat = lat2 - lat1;
        let dlon = lon2 - lon1;
        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
    }
}

/// Computes the total contextual adjustment for one game.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAdjuster;

impl ContextAdjuster {
    /// Sum of the independent terms: travel, altitude, kickoff slot.
    /// Negative output penalizes the visitor.
    pub fn adjustment(
        &self,
        away_home_venue: &Venue,
        game_venue: &Venue,
        slot: KickoffSlot,
    ) -> f64 {
        self.travel_adjustment(away_home_venue, game_venue)
            + self.altitude_adjustment(game_venue)
            + slot.adjustment()
    }

    pub fn travel_adjustment(&self, away_home_venue: &Venue, game_venue: &Venue) -> f64 {
        let miles = away_home_venue.distance_miles(game_venue);
        TRAVEL_POINTS_PER_1000_MILES * (miles / 1000.0)
    }

    pub fn altitude_adjustment(&self, game_venue: &Venue) -> f64 {
        if game_venue.altitude_ft > ALTITUDE_THRESHOLD_FT {
            ALTITUDE_ADJUSTMENT
        } else {
            0.0
        }
    }
}

/// Total contextual adjustment per `game_id`. Games without a row resolve
/// to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextTable {
    adjustments: HashMap<u32, f64>,
}

impl ContextTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            adjustments: rows.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, game_id: u32, adjustment: f64) {
        self.adjustments.insert(game_id, adjustment);
    }

    /// Adjustment for a game; 0 when absent.
    pub fn get(&self, game_id: u32) -> f64 {
        self.adjustments.get(&game_id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.adjustments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }
}
