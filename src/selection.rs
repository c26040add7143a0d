use particle_id::ParticleID;
use serde::{Deserialize, Serialize};

use crate::particle::{pseudorapidity, Particle, MASS_PION_CHARGED};

const PION_PLUS: ParticleID = ParticleID::new(211);
const PION_MINUS: ParticleID = ParticleID::new(-211);

/// A reconstructed track with the quality information used for selection
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    /// Charge sign, ±1
    pub sign: i8,
    pub has_its: bool,
    pub has_tpc: bool,
    pub has_tof: bool,
    pub is_pv_contributor: bool,
    /// Bit n is set if ITS layer n + 1 has a cluster
    pub its_cluster_map: u8,
    pub its_n_cls: u8,
    pub tpc_n_cls_crossed_rows: u16,
    pub tpc_n_cls_findable: u16,
    pub tpc_chi2_ncl: f64,
    pub its_chi2_ncl: f64,
    pub dca_xy: f64,
    pub dca_z: f64,
}

impl Track {
    pub fn pt(&self) -> f64 {
        (self.px * self.px + self.py * self.py).sqrt()
    }

    pub fn eta(&self) -> f64 {
        pseudorapidity([self.px, self.py, self.pz])
    }

    /// Whether ITS layer `layer` (counting from 1 to 7) has a cluster
    pub fn has_its_hit(&self, layer: u8) -> bool {
        if !(1..=7).contains(&layer) {
            return false;
        }
        self.its_cluster_map & (1 << (layer - 1)) != 0
    }

    pub fn crossed_rows_over_findable(&self) -> f64 {
        self.tpc_n_cls_crossed_rows as f64 / self.tpc_n_cls_findable as f64
    }

    /// Particle under the charged-pion mass hypothesis
    pub fn to_particle(&self, tag: usize) -> Particle {
        let id = if self.sign < 0 {
            PION_MINUS
        } else {
            PION_PLUS
        };
        Particle::with_mass(id, [self.px, self.py, self.pz], MASS_PION_CHARGED, tag)
    }
}

/// Fixed track quality cuts for particles entering jet clustering
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct JetTrackCuts {
    pub min_tpc_crossed_rows: u16,
    pub min_crossed_rows_over_findable: f64,
    pub max_chi2_tpc: f64,
    pub max_chi2_its: f64,
    pub max_abs_eta: f64,
    pub min_pt: f64,
    /// |DCAxy| < p0 + p1 / pt^p2
    pub dca_xy_par: [f64; 3],
    pub max_dca_z: f64,
}

impl Default for JetTrackCuts {
    fn default() -> Self {
        Self {
            min_tpc_crossed_rows: 70,
            min_crossed_rows_over_findable: 0.8,
            max_chi2_tpc: 4.0,
            max_chi2_its: 36.0,
            max_abs_eta: 0.8,
            min_pt: 0.1,
            dca_xy_par: [0.0105, 0.035, 1.1],
            max_dca_z: 2.0,
        }
    }
}

impl JetTrackCuts {
    pub fn passes(&self, track: &Track) -> bool {
        if !track.has_its {
            return false;
        }
        if !(1..=3).any(|layer| track.has_its_hit(layer)) {
            return false;
        }
        if !track.has_tpc {
            return false;
        }
        if track.tpc_n_cls_crossed_rows < self.min_tpc_crossed_rows {
            return false;
        }
        if track.crossed_rows_over_findable() < self.min_crossed_rows_over_findable {
            return false;
        }
        if track.tpc_chi2_ncl > self.max_chi2_tpc || track.its_chi2_ncl > self.max_chi2_its {
            return false;
        }
        let eta = track.eta();
        if eta < -self.max_abs_eta || eta > self.max_abs_eta {
            return false;
        }
        let pt = track.pt();
        if pt < self.min_pt {
            return false;
        }
        let [p0, p1, p2] = self.dca_xy_par;
        if track.dca_xy.abs() > p0 + p1 / pt.powf(p2) {
            return false;
        }
        track.dca_z.abs() <= self.max_dca_z
    }
}

/// Configurable track cuts for (anti)nucleus candidates
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackCuts {
    pub require_pv_contributor: bool,
    pub min_its_n_cls: u8,
    pub min_tpc_crossed_rows: u16,
    pub min_crossed_rows_over_findable: f64,
    pub max_chi2_tpc: f64,
    pub max_chi2_its: f64,
    pub min_pt: f64,
    pub min_eta: f64,
    pub max_eta: f64,
    pub max_dca_xy: f64,
    pub max_dca_z: f64,
}

impl Default for TrackCuts {
    fn default() -> Self {
        Self {
            require_pv_contributor: false,
            min_its_n_cls: 5,
            min_tpc_crossed_rows: 80,
            min_crossed_rows_over_findable: 0.8,
            max_chi2_tpc: 4.0,
            max_chi2_its: 36.0,
            min_pt: 0.3,
            min_eta: -0.8,
            max_eta: 0.8,
            max_dca_xy: 0.05,
            max_dca_z: 0.05,
        }
    }
}

pub const N_SYSTEMATICS: usize = 10;
const ITS_N_CLS_SYST: [u8; N_SYSTEMATICS] = [5, 6, 5, 4, 5, 3, 5, 6, 3, 4];
const TPC_CROSSED_ROWS_SYST: [u16; N_SYSTEMATICS] =
    [100, 85, 80, 110, 95, 90, 105, 95, 100, 105];
const DCA_XY_SYST: [f64; N_SYSTEMATICS] =
    [0.05, 0.07, 0.10, 0.03, 0.06, 0.15, 0.08, 0.04, 0.09, 0.10];
const DCA_Z_SYST: [f64; N_SYSTEMATICS] =
    [0.1, 0.15, 0.3, 0.075, 0.12, 0.18, 0.2, 0.1, 0.15, 0.2];

impl TrackCuts {
    /// Cut variation number `index` used for systematic uncertainties
    pub fn systematic(index: usize) -> Option<Self> {
        if index >= N_SYSTEMATICS {
            return None;
        }
        Some(Self {
            min_its_n_cls: ITS_N_CLS_SYST[index],
            min_tpc_crossed_rows: TPC_CROSSED_ROWS_SYST[index],
            max_dca_xy: DCA_XY_SYST[index],
            max_dca_z: DCA_Z_SYST[index],
            ..Default::default()
        })
    }

    /// Quality and kinematic cuts, without the DCA
    pub fn passes_quality(&self, track: &Track) -> bool {
        if self.require_pv_contributor && !track.is_pv_contributor {
            return false;
        }
        if !track.has_its || track.its_n_cls < self.min_its_n_cls {
            return false;
        }
        if !track.has_tpc || track.tpc_n_cls_crossed_rows < self.min_tpc_crossed_rows {
            return false;
        }
        if track.crossed_rows_over_findable() < self.min_crossed_rows_over_findable {
            return false;
        }
        if track.tpc_chi2_ncl > self.max_chi2_tpc || track.its_chi2_ncl > self.max_chi2_its {
            return false;
        }
        let eta = track.eta();
        if eta < self.min_eta || eta > self.max_eta {
            return false;
        }
        track.pt() >= self.min_pt
    }

    pub fn passes_dca(&self, track: &Track) -> bool {
        track.dca_xy.abs() <= self.max_dca_xy && track.dca_z.abs() <= self.max_dca_z
    }

    pub fn passes(&self, track: &Track) -> bool {
        self.passes_quality(track) && self.passes_dca(track)
    }
}

/// Particles for jet clustering, tagged with their track index
pub fn select_for_jets(tracks: &[Track], cuts: &JetTrackCuts) -> Vec<Particle> {
    Vec::from_iter(
        tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| cuts.passes(track))
            .map(|(idx, track)| track.to_particle(idx)),
    )
}
