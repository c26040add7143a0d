use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::calibration::{ReweightingConfig, UnfoldingConfig};
use crate::jets::{GhostSpec, JetDefinition};

/// Analysis settings
///
/// Missing entries in a configuration file take their default values.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub jet_def: JetDefinition,
    /// Minimum corrected jet transverse momentum
    pub min_jet_pt: f64,
    pub min_eta: f64,
    pub max_eta: f64,
    /// Jets must stay this far from the edge of the acceptance
    pub delta_eta_edge: f64,
    /// Minimum transverse momentum of generated particles
    pub min_particle_pt: f64,
    pub ghosts: GhostSpec,
    /// Radius of the perpendicular cones for the background estimate
    pub background_radius: f64,
    pub reject_events: bool,
    pub rejection_percentage: u32,
    pub unfolding: UnfoldingConfig,
    pub reweighting: ReweightingConfig,
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            jet_def: JetDefinition::default(),
            min_jet_pt: 10.0,
            min_eta: -0.8,
            max_eta: 0.8,
            delta_eta_edge: 0.05,
            min_particle_pt: 0.1,
            ghosts: GhostSpec::default(),
            background_radius: 0.4,
            reject_events: false,
            rejection_percentage: 3,
            unfolding: UnfoldingConfig::default(),
            reweighting: ReweightingConfig::default(),
            seed: 0,
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {path:?}"))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {path:?}"))
    }

    /// Settings for generator-level events, which are never unfolded
    pub fn generator_level(mut self) -> Self {
        if self.unfolding.apply {
            info!("Generator-level input: no jet pt unfolding");
            self.unfolding.apply = false;
        }
        self
    }

    /// Whether a jet at pseudorapidity `eta` is fully inside the acceptance
    pub fn jet_in_acceptance(&self, eta: f64) -> bool {
        eta.abs() + self.jet_def.radius <= self.max_eta - self.delta_eta_edge
    }
}
