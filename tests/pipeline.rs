use std::f64::consts::FRAC_PI_2;

use float_eq::assert_float_eq;
use jetcone::angle::delta_phi;
use jetcone::hist::{Binning, Hist2D};
use jetcone::{AnalysisConfig, Calibration, EventOutcome, JetAnalysis, Particle};
use particle_id::ParticleID;

const PION: ParticleID = ParticleID::new(211);

fn massless(pt: f64, eta: f64, phi: f64, tag: usize) -> Particle {
    let p = [pt * phi.cos(), pt * phi.sin(), pt * eta.sinh()];
    Particle::with_mass(PION, p, 0., tag)
}

/// A hard central jet with some soft particles around it
fn dijet_event() -> Vec<Particle> {
    vec![
        massless(25., 0.1, 1., 0),
        massless(4., 0.15, 1.1, 1),
        massless(0.5, 0.05, 1. + FRAC_PI_2, 2),
        massless(0.5, 0.1, 1. - FRAC_PI_2, 3),
        massless(0.3, -0.6, 3.5, 4),
    ]
}

fn without_unfolding() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.unfolding.apply = false;
    config
}

#[test]
fn central_jet() {
    let analysis = JetAnalysis::new(without_unfolding(), &Calibration::default());
    let (outcomes, counters) = analysis.process_events(&[dijet_event()], 1);
    assert_eq!(counters.processed, 1);
    assert_eq!(counters.with_jets, 1);
    let EventOutcome::Jets(summary) = &outcomes[0] else {
        panic!("expected jets, got {:?}", outcomes[0]);
    };
    assert_eq!(summary.jets.len(), 1);
    let jet = &summary.jets[0];
    assert_eq!(jet.index, 0);
    assert_float_eq!(jet.cone_radius, 0.3, rmax <= 0.1);
    assert!(jet.pt.subtracted < jet.pt.raw);
    assert_eq!(jet.pt.corrected, jet.pt.subtracted);
    assert!(summary.rho.rho > 0.);

    assert!(jet.membership[0].jet && jet.membership[1].jet);
    assert!(jet.membership[2].in_ue());
    assert!(jet.membership[3].in_ue());
    assert!(jet.membership[4].is_none());
    for axis in &jet.ue_axes {
        assert_float_eq!(delta_phi(axis.phi(), jet.phi), FRAC_PI_2, abs <= 0.05);
    }
}

fn flat_response() -> Calibration {
    let jet_pt = Binning::uniform(10, 0., 100.).unwrap();
    let shift = Binning::uniform(20, -10., 10.).unwrap();
    let mut response = Hist2D::new(jet_pt, shift);
    for x in 0..10 {
        for y in 0..20 {
            response.fill(10. * x as f64 + 5., y as f64 - 9.5, 1.);
        }
    }
    Calibration {
        response: Some(response),
        ..Default::default()
    }
}

#[test]
fn reproducible_with_unfolding() {
    let calibration = flat_response();
    let mut config = AnalysisConfig::default();
    config.min_jet_pt = 0.;
    let analysis = JetAnalysis::new(config, &calibration);

    let events = vec![dijet_event(); 8];
    let (first, _) = analysis.process_events(&events, 42);
    let (second, _) = analysis.process_events(&events, 42);
    assert_eq!(first, second);
    for outcome in &first {
        let EventOutcome::Jets(summary) = outcome else {
            panic!("expected jets, got {outcome:?}");
        };
        let pt = summary.jets[0].pt;
        assert!((pt.corrected - pt.subtracted).abs() <= 10.);
    }
}

#[test]
fn empty_and_rejected_events() {
    let mut config = without_unfolding();
    config.reject_events = true;
    config.rejection_percentage = 50;
    let analysis = JetAnalysis::new(config, &Calibration::default());
    let events = vec![Vec::new(); 200];
    let (_, counters) = analysis.process_events(&events, 7);
    assert_eq!(counters.processed, 200);
    assert_eq!(counters.rejected + counters.empty, 200);
    assert!(counters.rejected > 60 && counters.rejected < 150);
    assert_eq!(counters.with_jets, 0);

    let analysis = JetAnalysis::new(without_unfolding(), &Calibration::default());
    let forward = vec![massless(30., 0.7, 0., 0)];
    let (outcomes, _) = analysis.process_events(&[forward], 0);
    assert_eq!(outcomes[0], EventOutcome::NoJets);
}

#[test]
fn generator_level_jets_are_not_unfolded() {
    let calibration = flat_response();
    let config = AnalysisConfig::default().generator_level();
    let analysis = JetAnalysis::new(config, &calibration);
    let (outcomes, _) = analysis.process_events(&vec![dijet_event(); 4], 5);
    for outcome in &outcomes {
        let EventOutcome::Jets(summary) = outcome else {
            panic!("expected jets, got {outcome:?}");
        };
        for jet in &summary.jets {
            assert_eq!(jet.pt.corrected, jet.pt.subtracted);
        }
    }
}
