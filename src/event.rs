use avery::event::Status;
use particle_id::ParticleID;

use crate::particle::{pseudorapidity, Particle, MASS_PION_CHARGED};

/// |PDG id| of long-lived charged particles reaching the detector
const CHARGED_FINAL_STATE: [i32; 13] = [
    11, 13, 211, 321, 2212, 3112, 3222, 3312, 3334, 1000010020, 1000010030,
    1000020030, 1000020040,
];

/// Outgoing particle momenta of a generated event
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Event {
    pub out: Vec<(ParticleID, [f64; 4])>,
}

impl From<avery::Event> for Event {
    fn from(event: avery::Event) -> Self {
        let out = Vec::from_iter(event.particles.into_iter().filter_map(|p| {
            if p.status != Some(Status::Outgoing) {
                return None;
            }
            Some((p.id?, p.p?))
        }));
        Self { out }
    }
}

pub fn is_charged_final_state(id: ParticleID) -> bool {
    CHARGED_FINAL_STATE.contains(&id.id().abs())
}

/// Kinematic selection of generated particles entering the analysis
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParticleSelection {
    pub min_eta: f64,
    pub max_eta: f64,
    pub min_pt: f64,
}

impl Event {
    /// Charged final-state particles passing `selection`
    ///
    /// Energies are recomputed with the charged-pion mass, as for
    /// reconstructed tracks. Tags are positions in the returned list.
    pub fn charged_particles(&self, selection: &ParticleSelection) -> Vec<Particle> {
        let mut particles = Vec::new();
        for &(id, [_, px, py, pz]) in &self.out {
            if !is_charged_final_state(id) {
                continue;
            }
            let eta = pseudorapidity([px, py, pz]);
            if eta < selection.min_eta || eta > selection.max_eta {
                continue;
            }
            if (px * px + py * py).sqrt() < selection.min_pt {
                continue;
            }
            let tag = particles.len();
            particles.push(Particle::with_mass(id, [px, py, pz], MASS_PION_CHARGED, tag));
        }
        particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> ParticleSelection {
        ParticleSelection {
            min_eta: -0.8,
            max_eta: 0.8,
            min_pt: 0.1,
        }
    }

    #[test]
    fn charged_species() {
        assert!(is_charged_final_state(ParticleID::new(-2212)));
        assert!(is_charged_final_state(ParticleID::new(1000010020)));
        assert!(!is_charged_final_state(ParticleID::new(22)));
        assert!(!is_charged_final_state(ParticleID::new(2112)));
    }

    #[test]
    fn selection_and_tags() {
        let event = Event {
            out: vec![
                (ParticleID::new(22), [5., 5., 0., 0.]),
                (ParticleID::new(-2212), [2., 1., 1., 0.]),
                (ParticleID::new(211), [1., 0.05, 0., 0.]),
                (ParticleID::new(211), [10., 1., 0., 9.]),
                (ParticleID::new(-211), [3., 0., 2., 0.1]),
            ],
        };
        let particles = event.charged_particles(&selection());
        assert_eq!(particles.len(), 2);
        assert_eq!(particles[0].id, ParticleID::new(-2212));
        assert_eq!(particles[0].tag, 0);
        assert_eq!(particles[1].id, ParticleID::new(-211));
        assert_eq!(particles[1].tag, 1);
        let e = (1. + 1. + MASS_PION_CHARGED * MASS_PION_CHARGED).sqrt();
        assert!((particles[0].p[0] - e).abs() < 1e-12);
    }
}
