use crate::angle::delta_phi;
use crate::axis::Axis;

/// Distance in the pseudorapidity-azimuth plane
pub fn delta_r(eta1: f64, phi1: f64, eta2: f64, phi2: f64) -> f64 {
    let deta = eta1 - eta2;
    let dphi = delta_phi(phi1, phi2);
    (deta * deta + dphi * dphi).sqrt()
}

/// Whether the direction (eta, phi) lies inside the cone around (axis_eta, axis_phi)
pub fn in_cone(eta: f64, phi: f64, axis_eta: f64, axis_phi: f64, radius: f64) -> bool {
    delta_r(eta, phi, axis_eta, axis_phi) <= radius
}

/// Cone around a reference axis
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Cone {
    pub eta: f64,
    pub phi: f64,
    pub radius: f64,
}

impl Cone {
    pub fn around(axis: &Axis, radius: f64) -> Self {
        Self {
            eta: axis.eta(),
            phi: axis.phi(),
            radius,
        }
    }

    pub fn contains(&self, eta: f64, phi: f64) -> bool {
        in_cone(eta, phi, self.eta, self.phi, self.radius)
    }
}

/// Where a particle ends up with respect to one jet
///
/// The two underlying-event cones are not exclusive.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
pub struct ConeMembership {
    pub jet: bool,
    pub ue1: bool,
    pub ue2: bool,
}

impl ConeMembership {
    pub fn in_ue(&self) -> bool {
        self.ue1 || self.ue2
    }

    pub fn is_none(&self) -> bool {
        !(self.jet || self.in_ue())
    }

    /// Weight for underlying-event yields
    ///
    /// Each cone counts one half, so the result is 0, 0.5 or 1.
    pub fn ue_weight(&self) -> f64 {
        0.5 * (self.ue1 as u8 + self.ue2 as u8) as f64
    }
}
