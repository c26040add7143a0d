use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use rand::Rng;

use crate::hist::Hist2D;
use crate::jets::Jet;

/// Maps a reconstructed jet pt to a corrected one with a detector response
///
/// The response has the reconstructed pt on the x axis and the
/// correction `pt_gen - pt_rec` on the y axis. Without a response, or
/// for a pt outside the calibrated range, the input is returned as is.
#[derive(Debug, Default)]
pub struct PtUnfolder {
    response: Option<Hist2D>,
    out_of_range_reported: AtomicBool,
}

impl PtUnfolder {
    pub fn new(response: Option<Hist2D>) -> Self {
        if response.is_none() {
            warn!("No jet pt response matrix, jet pt will not be unfolded");
        }
        Self {
            response,
            out_of_range_reported: AtomicBool::new(false),
        }
    }

    /// Corrected pt, drawing the correction from `rng`
    pub fn correct<R: Rng + ?Sized>(&self, pt_rec: f64, rng: &mut R) -> f64 {
        let Some(response) = &self.response else {
            return pt_rec;
        };
        let Some(bin) = response.x_axis().find_bin(pt_rec) else {
            if !self.out_of_range_reported.swap(true, Ordering::Relaxed) {
                warn!(
                    "Jet pt {pt_rec} outside calibrated range [{}, {}), not unfolding",
                    response.x_axis().min(),
                    response.x_axis().max()
                );
            } else {
                debug!("Jet pt {pt_rec} outside calibrated range");
            }
            return pt_rec;
        };
        match response.sample_y(bin, rng) {
            Some(delta_pt) => pt_rec + delta_pt,
            None => pt_rec,
        }
    }
}

impl Clone for PtUnfolder {
    fn clone(&self) -> Self {
        Self {
            response: self.response.clone(),
            out_of_range_reported: AtomicBool::new(
                self.out_of_range_reported.load(Ordering::Relaxed),
            ),
        }
    }
}

/// Fill the detector response with one reconstructed jet
///
/// `gen_pt` maps a constituent index to the transverse momentum of the
/// matched generated particle, if there is one. Returns whether the
/// entry was inside the histogram range.
pub fn fill_detector_response<F>(response: &mut Hist2D, jet: &Jet, gen_pt: F) -> bool
where
    F: Fn(usize) -> Option<f64>,
{
    let jet_pt_gen: f64 = jet.constituents.iter().filter_map(|&idx| gen_pt(idx)).sum();
    response.fill(jet.pt, jet_pt_gen - jet.pt, 1.)
}
