use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use jetty::{
    anti_kt_f, cambridge_aachen_f, kt_f, ClusterHistory, ClusterStep, PseudoJet,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::axis::Axis;
use crate::particle::{self, Particle};

#[derive(
    Display,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Deserialize,
    Serialize,
)]
pub enum JetAlgorithm {
    #[default]
    #[strum(to_string = "anti-kt")]
    AntiKt,
    #[strum(to_string = "kt")]
    Kt,
    #[strum(to_string = "Cambridge/Aachen")]
    CambridgeAachen,
}

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct JetDefinition {
    pub algorithm: JetAlgorithm,
    pub radius: f64,
    pub min_pt: f64,
}

impl Default for JetDefinition {
    fn default() -> Self {
        Self {
            algorithm: JetAlgorithm::AntiKt,
            radius: 0.3,
            min_pt: 0.,
        }
    }
}

/// Ghost grid used to measure jet areas
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GhostSpec {
    /// Ghosts cover |η| ≤ max_eta
    pub max_eta: f64,
    /// Target area of a single ghost cell
    pub area: f64,
}

impl Default for GhostSpec {
    fn default() -> Self {
        Self {
            max_eta: 1.0,
            area: 0.01,
        }
    }
}

impl GhostSpec {
    /// Centres (η, φ) of all ghost cells together with the cell area
    pub fn cells(&self) -> (Vec<(f64, f64)>, f64) {
        if !(self.max_eta > 0. && self.area > 0.) {
            return (Vec::new(), 0.);
        }
        let side = self.area.sqrt();
        let n_eta = (2. * self.max_eta / side).ceil() as usize;
        let n_phi = (TAU / side).ceil() as usize;
        let d_eta = 2. * self.max_eta / n_eta as f64;
        let d_phi = TAU / n_phi as f64;
        let mut centres = Vec::with_capacity(n_eta * n_phi);
        for i in 0..n_eta {
            let eta = -self.max_eta + (i as f64 + 0.5) * d_eta;
            for j in 0..n_phi {
                centres.push((eta, (j as f64 + 0.5) * d_phi));
            }
        }
        (centres, d_eta * d_phi)
    }
}

/// A jet candidate with its area and constituents
#[derive(Clone, PartialEq, Debug)]
pub struct Jet {
    /// Four-momentum (E, px, py, pz)
    pub p: [f64; 4],
    pub pt: f64,
    pub eta: f64,
    pub y: f64,
    pub phi: f64,
    /// Positive when present
    pub area: Option<f64>,
    /// Indices into the clustered particle slice
    pub constituents: Vec<usize>,
}

impl Jet {
    pub fn new(p: [f64; 4], area: Option<f64>, constituents: Vec<usize>) -> Self {
        Self {
            p,
            pt: particle::pt(&p),
            eta: particle::eta(&p),
            y: particle::y(&p),
            phi: particle::phi(&p),
            area: area.filter(|a| *a > 0.),
            constituents,
        }
    }

    pub fn axis(&self) -> Axis {
        Axis([self.p[1], self.p[2], self.p[3]])
    }

    /// Radius of the circle with the same area as the jet
    pub fn cone_radius(&self) -> Option<f64> {
        self.area.map(cone_radius)
    }

    pub fn has_constituent(&self, idx: usize) -> bool {
        self.constituents.contains(&idx)
    }
}

pub fn cone_radius(area: f64) -> f64 {
    (area / PI).sqrt()
}

/// Turns the selected particles of an event into jet candidates
pub trait Clusterer {
    /// Jets sorted by decreasing transverse momentum
    fn cluster(&self, particles: &[Particle]) -> Vec<Jet>;
}

/// Ghost transverse momentum, small enough to leave hard jets unchanged
const GHOST_PT: f64 = 1e-100;

/// Clustering with `jetty`, with active areas from a ghost grid
///
/// Particles and ghosts are clustered together. Constituents and areas
/// are read off the recombination history.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JettyClusterer {
    pub jet_def: JetDefinition,
    pub ghosts: GhostSpec,
}

impl JettyClusterer {
    pub fn new(jet_def: JetDefinition, ghosts: GhostSpec) -> Self {
        Self { jet_def, ghosts }
    }

    fn history(&self, inputs: Vec<PseudoJet>) -> ClusterHistory<'static> {
        let r = self.jet_def.radius;
        match self.jet_def.algorithm {
            JetAlgorithm::AntiKt => ClusterHistory::new(inputs, anti_kt_f(r)),
            JetAlgorithm::Kt => ClusterHistory::new(inputs, kt_f(r)),
            JetAlgorithm::CambridgeAachen => {
                ClusterHistory::new(inputs, cambridge_aachen_f(r))
            }
        }
    }
}

fn ghost(eta: f64, phi: f64) -> PseudoJet {
    let pt = GHOST_PT;
    PseudoJet::from([
        pt * eta.cosh(),
        pt * phi.cos(),
        pt * phi.sin(),
        pt * eta.sinh(),
    ])
}

/// Input indices behind pseudojets still being clustered
///
/// Identical momenta share a key, so each key holds a stack.
type Members = HashMap<PseudoJet, Vec<Vec<usize>>>;

fn take(members: &mut Members, p: &PseudoJet) -> Vec<usize> {
    members
        .get_mut(p)
        .and_then(|stack| stack.pop())
        .unwrap_or_default()
}

fn to_array(p: &PseudoJet) -> [f64; 4] {
    [p.e().into(), p.px().into(), p.py().into(), p.pz().into()]
}

impl Clusterer for JettyClusterer {
    fn cluster(&self, particles: &[Particle]) -> Vec<Jet> {
        if particles.is_empty() {
            return Vec::new();
        }
        let (cells, cell_area) = self.ghosts.cells();
        let n_particles = particles.len();
        let inputs = Vec::from_iter(
            particles
                .iter()
                .map(|p| PseudoJet::from(p.p))
                .chain(cells.iter().map(|&(eta, phi)| ghost(eta, phi))),
        );

        let mut members = Members::new();
        for (idx, input) in inputs.iter().enumerate() {
            members.entry(*input).or_default().push(vec![idx]);
        }

        let minpt2 = self.jet_def.min_pt * self.jet_def.min_pt;
        let mut jets = Vec::new();
        for step in self.history(inputs) {
            match step {
                ClusterStep::Combine([pi, pj]) => {
                    let mut idx = take(&mut members, &pi);
                    idx.append(&mut take(&mut members, &pj));
                    members.entry(pi + pj).or_default().push(idx);
                }
                ClusterStep::Jet(jet) => {
                    let idx = take(&mut members, &jet);
                    let (mut constituents, ghosts): (Vec<_>, Vec<_>) =
                        idx.into_iter().partition(|&i| i < n_particles);
                    if constituents.is_empty() {
                        continue;
                    }
                    let mut p = jet;
                    for &g in &ghosts {
                        let (eta, phi) = cells[g - n_particles];
                        p -= ghost(eta, phi);
                    }
                    let p = to_array(&p);
                    if particle::pt2(&p) <= minpt2 {
                        continue;
                    }
                    let area = ghosts.len() as f64 * cell_area;
                    constituents.sort_unstable();
                    jets.push(Jet::new(p, Some(area), constituents));
                }
            }
        }
        debug!("{} jets from jetty", jets.len());

        jets.sort_by(|a, b| b.pt.total_cmp(&a.pt));
        for jet in &jets {
            trace!(
                "jet: pt = {}, η = {}, φ = {}, area = {:?}, {} constituents",
                jet.pt,
                jet.eta,
                jet.phi,
                jet.area,
                jet.constituents.len()
            );
        }
        jets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_eq::assert_float_eq;
    use jetty::Cluster;
    use particle_id::ParticleID;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const PION: ParticleID = ParticleID::new(211);

    fn massless(pt: f64, eta: f64, phi: f64, tag: usize) -> Particle {
        let p = [pt * phi.cos(), pt * phi.sin(), pt * eta.sinh()];
        Particle::with_mass(PION, p, 0., tag)
    }

    #[test]
    fn cone_radius_from_area() {
        let area = PI * 0.3 * 0.3;
        assert_float_eq!(cone_radius(area), 0.3, abs <= 1e-12);
        let jet = Jet::new([10., 10., 0., 0.], Some(area), vec![0]);
        assert_float_eq!(jet.cone_radius().unwrap(), 0.3, abs <= 1e-12);
        let jet = Jet::new([10., 10., 0., 0.], Some(0.), vec![0]);
        assert_eq!(jet.cone_radius(), None);
    }

    #[test]
    fn ghost_cells_tile_the_acceptance() {
        let ghosts = GhostSpec::default();
        let (cells, area) = ghosts.cells();
        assert_float_eq!(
            cells.len() as f64 * area,
            2. * ghosts.max_eta * TAU,
            r2nd <= 1e-12
        );
        assert!(area <= ghosts.area);
    }

    #[test]
    fn two_separated_jets() {
        let particles = vec![
            massless(20., 0.1, 1., 0),
            massless(5., 0.15, 1.1, 1),
            massless(8., -0.2, 4., 2),
            massless(1., -0.1, 4.05, 3),
        ];
        let clusterer = JettyClusterer::default();
        let jets = clusterer.cluster(&particles);
        assert_eq!(jets.len(), 2);
        assert_eq!(jets[0].constituents, vec![0, 1]);
        assert_eq!(jets[1].constituents, vec![2, 3]);
        assert!(jets[0].pt > jets[1].pt);
        let p_sum = particle::add(&particles[0].p, &particles[1].p);
        assert_float_eq!(jets[0].p, p_sum, abs_all <= 1e-12);
        // isolated jets in the central region cover a full disc
        let disc = PI * 0.3 * 0.3;
        for jet in &jets {
            assert_float_eq!(jet.area.unwrap(), disc, rmax <= 0.15);
        }
    }

    #[test]
    fn no_particles_no_jets() {
        assert!(JettyClusterer::default().cluster(&[]).is_empty());
    }

    fn random_event(rng: &mut StdRng, n: usize) -> Vec<Particle> {
        Vec::from_iter((0..n).map(|tag| {
            let pt = rng.gen_range(0.2..20.);
            let eta = rng.gen_range(-0.8..0.8);
            let phi = rng.gen_range(0. ..TAU);
            massless(pt, eta, phi, tag)
        }))
    }

    #[test]
    fn same_jets_as_jetty() {
        let mut rng = StdRng::seed_from_u64(3);
        let ghosts = GhostSpec {
            max_eta: 1.0,
            area: 0.05,
        };
        let algorithms = [
            JetAlgorithm::AntiKt,
            JetAlgorithm::Kt,
            JetAlgorithm::CambridgeAachen,
        ];
        for algorithm in algorithms {
            let jet_def = JetDefinition {
                algorithm,
                ..Default::default()
            };
            let clusterer = JettyClusterer::new(jet_def, ghosts);
            for _ in 0..10 {
                let particles = random_event(&mut rng, 40);
                let jets = clusterer.cluster(&particles);

                let inputs = Vec::from_iter(particles.iter().map(|p| PseudoJet::from(p.p)));
                let r = jet_def.radius;
                let reference = match algorithm {
                    JetAlgorithm::AntiKt => inputs.cluster(anti_kt_f(r)),
                    JetAlgorithm::Kt => inputs.cluster(kt_f(r)),
                    JetAlgorithm::CambridgeAachen => inputs.cluster(cambridge_aachen_f(r)),
                };
                let mut expected = Vec::from_iter(reference.iter().map(|j| particle::pt(&to_array(j))));
                expected.sort_by(|a, b| b.total_cmp(a));
                let found = Vec::from_iter(jets.iter().map(|j| j.pt));
                assert_float_eq!(found, expected, abs_all <= 1e-9, "{algorithm}");

                let mut all = Vec::from_iter(jets.iter().flat_map(|j| j.constituents.iter().copied()));
                all.sort_unstable();
                assert_eq!(all, Vec::from_iter(0..particles.len()), "{algorithm}");
                for jet in &jets {
                    let sum = jet.constituents.iter().fold([0.; 4], |acc, &i| {
                        particle::add(&acc, &particles[i].p)
                    });
                    assert_float_eq!(jet.p, sum, abs_all <= 1e-9);
                }
            }
        }
    }

    #[test]
    fn identical_particles_are_both_kept() {
        let particles = vec![massless(10., 0., 1., 0), massless(10., 0., 1., 1)];
        let jets = JettyClusterer::default().cluster(&particles);
        assert_eq!(jets.len(), 1);
        assert_eq!(jets[0].constituents, vec![0, 1]);
        assert_float_eq!(jets[0].pt, 20., abs <= 1e-9);
    }
}
