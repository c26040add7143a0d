use std::f64::consts::{PI, TAU};

/// Map an angle onto [0, 2π)
pub fn phi_0_2pi(phi: f64) -> f64 {
    let phi = phi.rem_euclid(TAU);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if phi >= TAU {
        0.
    } else {
        phi
    }
}

/// Shortest azimuthal separation between two angles, in [0, π]
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let diff = (phi_0_2pi(phi1) - phi_0_2pi(phi2)).abs();
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}
