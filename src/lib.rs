//! Jets and underlying-event cones in collider events.
//!
//! Events are clustered into jets, the diffuse background is estimated
//! from cones perpendicular to the leading jet and subtracted, and the
//! jet transverse momenta are smeared back to particle level with a
//! detector response matrix. Every accepted jet gets two cones
//! perpendicular to its axis that sample the underlying event.
#![warn(clippy::all, rust_2018_idioms)]

pub mod analysis;
pub mod angle;
pub mod axis;
pub mod background;
pub mod calibration;
pub mod cone;
pub mod config;
pub mod error;
pub mod event;
pub mod hist;
pub mod jets;
pub mod particle;
pub mod rejection;
pub mod selection;
pub mod unfold;

pub use analysis::{
    AcceptedJet, AntiprotonYield, EventCounters, EventOutcome, EventSummary,
    JetAnalysis,
};
pub use axis::{perpendicular_axis, try_perpendicular_axis, ue_axes, Axis, Sign};
pub use calibration::{Calibration, CalibrationStore, JsonCalibrationStore};
pub use config::AnalysisConfig;
pub use particle::Particle;
