//! Find jets and their underlying-event cones in generated events.
//!
//! Start with
//!
//!     jetcone EVENTFILES
//!
//! Event files can be in any format understood by
//! [event-file-reader](https://crates.io/crates/event-file-reader),
//! optionally compressed.
mod opt;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use event_file_reader::EventFileReader as Reader;
use log::{debug, info};

use jetcone::calibration::{Calibration, JsonCalibrationStore};
use jetcone::event::{Event, ParticleSelection};
use jetcone::{AnalysisConfig, AntiprotonYield, EventOutcome, JetAnalysis, Particle};

use crate::opt::Opt;

fn main() -> Result<()> {
    let opt = Opt::parse();

    let env = Env::default().filter_or("JETCONE_LOG", opt.verbosity.as_str());
    env_logger::init_from_env(env);

    let mut config = match &opt.config {
        Some(file) => AnalysisConfig::from_file(file)?,
        None => AnalysisConfig::default(),
    };
    if let Some(seed) = opt.seed {
        config.seed = seed;
    }
    let config = config.generator_level();
    debug!("Settings: {config:#?}");

    let calibration = match &opt.calibration {
        Some(dir) => {
            let store = JsonCalibrationStore::new(dir);
            Calibration::load(&store, &config.unfolding, &config.reweighting)
        }
        None => Calibration::default(),
    };

    let selection = ParticleSelection {
        min_eta: config.min_eta,
        max_eta: config.max_eta,
        min_pt: config.min_particle_pt,
    };
    let mut events = Vec::new();
    for file in &opt.files {
        debug!("Importing events from {file:?}");
        import(file, &selection, &mut events)?;
    }
    info!("Read {} events", events.len());

    let seed = config.seed;
    let analysis = JetAnalysis::new(config, &calibration);
    let (outcomes, counters) = analysis.process_events(&events, seed);

    println!("{counters:#?}");
    let mut antiprotons = AntiprotonYield::default();
    for (idx, (particles, outcome)) in events.iter().zip(&outcomes).enumerate() {
        let EventOutcome::Jets(summary) = outcome else {
            continue;
        };
        for jet in &summary.jets {
            println!(
                "event {idx} jet {}: pt = {:.3} (raw {:.3}, subtracted {:.3}), η = {:.3}, φ = {:.3}, R = {:.3}",
                jet.index,
                jet.pt.corrected,
                jet.pt.raw,
                jet.pt.subtracted,
                jet.eta,
                jet.phi,
                jet.cone_radius
            );
        }
        antiprotons += AntiprotonYield::from_event(particles, summary, &calibration);
    }
    println!(
        "antiprotons in jets: {}, in underlying event: {}",
        antiprotons.jet, antiprotons.ue
    );
    Ok(())
}

fn import(
    file: &Path,
    selection: &ParticleSelection,
    events: &mut Vec<Vec<Particle>>,
) -> Result<()> {
    let reader = Reader::new(file)
        .with_context(|| format!("Failed to open {file:?}"))?;
    for event in reader {
        let event: avery::Event = event
            .with_context(|| format!("Failed to read event from {file:?}"))?
            .into();
        events.push(Event::from(event).charged_particles(selection));
    }
    Ok(())
}
