use std::ops::AddAssign;

use log::{debug, trace};
use particle_id::ParticleID;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::axis::{ue_axes, Axis};
use crate::background::{BackgroundCorrector, BackgroundEstimator, JetPt, PerpConeRho, Rho};
use crate::calibration::{Calibration, Region};
use crate::cone::{Cone, ConeMembership};
use crate::config::AnalysisConfig;
use crate::jets::{cone_radius, Clusterer, JettyClusterer};
use crate::particle::Particle;
use crate::rejection::EventRejector;
use crate::unfold::PtUnfolder;

const ANTIPROTON: ParticleID = ParticleID::new(-2212);

/// A jet passing acceptance and transverse momentum cuts
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedJet {
    /// Position in the list of clustered jets
    pub index: usize,
    pub pt: JetPt,
    pub eta: f64,
    pub phi: f64,
    pub area: f64,
    pub cone_radius: f64,
    pub ue_axes: [Axis; 2],
    /// Classification of every particle of the event, in input order
    pub membership: Vec<ConeMembership>,
}

impl AcceptedJet {
    /// Indices of particles in at least one underlying-event cone
    pub fn ue_particles(&self) -> impl Iterator<Item = usize> + '_ {
        self.membership
            .iter()
            .enumerate()
            .filter(|(_, m)| m.in_ue())
            .map(|(idx, _)| idx)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventSummary {
    pub rho: Rho,
    pub jets: Vec<AcceptedJet>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventOutcome {
    /// Discarded by random event rejection
    Rejected,
    /// No selected particles
    Empty,
    /// No jet passed the selection
    NoJets,
    Jets(EventSummary),
}

/// Weighted antiproton yields
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AntiprotonYield {
    pub jet: f64,
    pub ue: f64,
}

impl AntiprotonYield {
    /// Antiprotons in the jets and underlying-event cones of one event
    ///
    /// `particles` must be the slice passed to [`JetAnalysis::process_event`].
    pub fn from_event(
        particles: &[Particle],
        summary: &EventSummary,
        calibration: &Calibration,
    ) -> Self {
        let mut res = Self::default();
        for jet in &summary.jets {
            for (particle, membership) in particles.iter().zip(&jet.membership) {
                if particle.id != ANTIPROTON {
                    continue;
                }
                if membership.jet {
                    res.jet += calibration.antiproton_weight(
                        Region::Jet,
                        particle.pt,
                        particle.eta,
                    );
                }
                if membership.in_ue() {
                    res.ue += membership.ue_weight()
                        * calibration.antiproton_weight(
                            Region::Ue,
                            particle.pt,
                            particle.eta,
                        );
                }
            }
        }
        res
    }
}

impl AddAssign for AntiprotonYield {
    fn add_assign(&mut self, rhs: Self) {
        self.jet += rhs.jet;
        self.ue += rhs.ue;
    }
}

/// Event counts per outcome
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EventCounters {
    pub processed: u64,
    pub rejected: u64,
    pub empty: u64,
    pub without_jets: u64,
    pub with_jets: u64,
}

impl EventCounters {
    pub fn record(&mut self, outcome: &EventOutcome) {
        self.processed += 1;
        match outcome {
            EventOutcome::Rejected => self.rejected += 1,
            EventOutcome::Empty => self.empty += 1,
            EventOutcome::NoJets => self.without_jets += 1,
            EventOutcome::Jets(_) => self.with_jets += 1,
        }
    }
}

impl AddAssign for EventCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.processed += rhs.processed;
        self.rejected += rhs.rejected;
        self.empty += rhs.empty;
        self.without_jets += rhs.without_jets;
        self.with_jets += rhs.with_jets;
    }
}

/// Jet finding, background correction and cone classification per event
#[derive(Clone, Debug)]
pub struct JetAnalysis<C = JettyClusterer, B = PerpConeRho> {
    config: AnalysisConfig,
    clusterer: C,
    background: B,
    unfolder: Option<PtUnfolder>,
    rejector: Option<EventRejector>,
}

impl JetAnalysis {
    /// Analysis with the default collaborators
    pub fn new(config: AnalysisConfig, calibration: &Calibration) -> Self {
        let clusterer = JettyClusterer::new(config.jet_def, config.ghosts);
        let background = PerpConeRho {
            radius: config.background_radius,
        };
        Self::with_collaborators(config, clusterer, background, calibration)
    }
}

impl<C: Clusterer, B: BackgroundEstimator> JetAnalysis<C, B> {
    pub fn with_collaborators(
        config: AnalysisConfig,
        clusterer: C,
        background: B,
        calibration: &Calibration,
    ) -> Self {
        let unfolder = config
            .unfolding
            .apply
            .then(|| PtUnfolder::new(calibration.response.clone()));
        let rejector = config
            .reject_events
            .then(|| EventRejector::new(config.rejection_percentage));
        Self {
            config,
            clusterer,
            background,
            unfolder,
            rejector,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse one event
    ///
    /// `rng` drives event rejection and jet pt unfolding.
    pub fn process_event<R: Rng + ?Sized>(
        &self,
        particles: &[Particle],
        rng: &mut R,
    ) -> EventOutcome {
        if let Some(rejector) = &self.rejector {
            if rejector.should_reject(rng) {
                return EventOutcome::Rejected;
            }
        }
        if particles.is_empty() {
            return EventOutcome::Empty;
        }

        let jets = self.clusterer.cluster(particles);
        let rho = self.background.estimate(particles, &jets);
        let corrector = BackgroundCorrector::new(rho);
        debug!("{} jets, {rho:?}", jets.len());

        let mut accepted = Vec::new();
        for (index, jet) in jets.iter().enumerate() {
            if !self.config.jet_in_acceptance(jet.eta) {
                trace!("jet {index} at η = {} outside acceptance", jet.eta);
                continue;
            }
            let Some(area) = jet.area else {
                debug!("jet {index} has no area");
                continue;
            };
            let Some(pt) = corrector.correct(jet, self.unfolder.as_ref(), rng) else {
                continue;
            };
            if pt.corrected < self.config.min_jet_pt {
                trace!("jet {index} with corrected pt {} below threshold", pt.corrected);
                continue;
            }

            let radius = cone_radius(area);
            let ue_axes = ue_axes(&jet.axis());
            let ue_cones = ue_axes.map(|axis| Cone::around(&axis, radius));
            let membership = Vec::from_iter(
                particles.iter().enumerate().map(|(idx, particle)| {
                    ConeMembership {
                        jet: jet.has_constituent(idx),
                        ue1: ue_cones[0].contains(particle.eta, particle.phi),
                        ue2: ue_cones[1].contains(particle.eta, particle.phi),
                    }
                }),
            );
            accepted.push(AcceptedJet {
                index,
                pt,
                eta: jet.eta,
                phi: jet.phi,
                area,
                cone_radius: radius,
                ue_axes,
                membership,
            });
        }

        if accepted.is_empty() {
            EventOutcome::NoJets
        } else {
            EventOutcome::Jets(EventSummary {
                rho,
                jets: accepted,
            })
        }
    }
}

impl<C, B> JetAnalysis<C, B>
where
    C: Clusterer + Sync,
    B: BackgroundEstimator + Sync,
{
    /// Analyse events in parallel
    ///
    /// Each event gets its own random number generator derived from
    /// `seed` and the event index, so results do not depend on the
    /// number of threads.
    pub fn process_events<E>(&self, events: &[E], seed: u64) -> (Vec<EventOutcome>, EventCounters)
    where
        E: AsRef<[Particle]> + Sync,
    {
        let outcomes = Vec::from_par_iter(events.par_iter().enumerate().map(
            |(idx, event)| {
                let mut rng = event_rng(seed, idx);
                self.process_event(event.as_ref(), &mut rng)
            },
        ));
        let mut counters = EventCounters::default();
        for outcome in &outcomes {
            counters.record(outcome);
        }
        (outcomes, counters)
    }
}

/// Random number generator for the event with index `idx`
pub fn event_rng(seed: u64, idx: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
