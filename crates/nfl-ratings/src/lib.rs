//! ELO rating machinery for NFL season forecasting.
//!
//! - The margin-of-victory ELO update rule and win probabilities
//! - The rating store with preseason regression and market blending
//! - Per-game context adjustments (travel, altitude, prime time)
//! - Chronological rollforward over completed games
//! - Isotonic probability calibration

pub mod calibration;
pub mod context;
pub mod elo;
pub mod rollforward;
pub mod store;

pub use calibration::{CalibrationError, CalibrationMap, CURRENT_CALIBRATION_VERSION};
pub use context::{ContextAdjuster, ContextTable, KickoffSlot, Venue};
pub use elo::EloModel;
pub use rollforward::{RollforwardEngine, RollforwardRow};
pub use store::{RatingError, RatingStore};
