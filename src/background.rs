use std::f64::consts::{FRAC_PI_2, PI};

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cone::in_cone;
use crate::jets::Jet;
use crate::particle::{self, Particle};
use crate::unfold::PtUnfolder;

/// Per-event background densities
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Rho {
    /// Transverse momentum per unit area
    pub rho: f64,
    /// Transverse mass minus transverse momentum per unit area
    pub rho_m: f64,
}

/// Estimates the diffuse background of an event
pub trait BackgroundEstimator {
    fn estimate(&self, particles: &[Particle], jets: &[Jet]) -> Rho;
}

/// Background from two cones perpendicular in azimuth to the leading jet
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PerpConeRho {
    pub radius: f64,
}

impl Default for PerpConeRho {
    fn default() -> Self {
        Self { radius: 0.4 }
    }
}

impl BackgroundEstimator for PerpConeRho {
    fn estimate(&self, particles: &[Particle], jets: &[Jet]) -> Rho {
        let Some(leading) = jets.first() else {
            return Rho::default();
        };
        let phi_perp = [leading.phi + FRAC_PI_2, leading.phi - FRAC_PI_2];
        let mut pt_sum = 0.;
        let mut mt_sum = 0.;
        for particle in particles {
            for phi in phi_perp {
                if in_cone(particle.eta, particle.phi, leading.eta, phi, self.radius) {
                    let m2 = particle.m2().max(0.);
                    pt_sum += particle.pt;
                    mt_sum += (m2 + particle.pt * particle.pt).sqrt() - particle.pt;
                }
            }
        }
        let area = 2. * PI * self.radius * self.radius;
        let rho = Rho {
            rho: pt_sum / area,
            rho_m: mt_sum / area,
        };
        trace!("background: {rho:?}");
        rho
    }
}

/// Background-subtracted transverse momentum
pub fn subtracted_pt(pt: f64, area: f64, rho: f64) -> f64 {
    pt - area * rho
}

/// Area-based subtraction of the background from a four-momentum
///
/// The area four-vector points along the jet. If the background exceeds
/// the jet's transverse momentum the result is the zero vector.
pub fn subtract(p: &[f64; 4], area: f64, rho: Rho) -> [f64; 4] {
    let y = particle::y(p);
    let phi = particle::phi(p);
    let area4 = [
        area * y.cosh(),
        area * phi.cos(),
        area * phi.sin(),
        area * y.sinh(),
    ];
    let to_subtract = [
        rho.rho * area4[0] + rho.rho_m * area4[0],
        rho.rho * area4[1],
        rho.rho * area4[2],
        rho.rho * area4[3] + rho.rho_m * area4[3],
    ];
    if particle::pt2(&to_subtract) >= particle::pt2(p) {
        return [0.; 4];
    }
    [
        p[0] - to_subtract[0],
        p[1] - to_subtract[1],
        p[2] - to_subtract[2],
        p[3] - to_subtract[3],
    ]
}

/// Transverse momenta of a jet at each correction stage
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct JetPt {
    pub raw: f64,
    pub subtracted: f64,
    pub corrected: f64,
}

/// Subtracts the event background from jets and unfolds the result
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BackgroundCorrector {
    pub rho: Rho,
}

impl BackgroundCorrector {
    pub fn new(rho: Rho) -> Self {
        Self { rho }
    }

    /// Transverse momentum after background subtraction, `None` without area
    pub fn subtracted_pt(&self, jet: &Jet) -> Option<f64> {
        let area = jet.area?;
        Some(particle::pt(&subtract(&jet.p, area, self.rho)))
    }

    /// Subtract the background, then pass the result through `unfolder`
    pub fn correct<R: Rng + ?Sized>(
        &self,
        jet: &Jet,
        unfolder: Option<&PtUnfolder>,
        rng: &mut R,
    ) -> Option<JetPt> {
        let subtracted = self.subtracted_pt(jet)?;
        let corrected = match unfolder {
            Some(unfolder) => unfolder.correct(subtracted, rng),
            None => subtracted,
        };
        Some(JetPt {
            raw: jet.pt,
            subtracted,
            corrected,
        })
    }
}
