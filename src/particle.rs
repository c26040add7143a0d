use particle_id::ParticleID;

/// Charged pion mass in GeV, the default mass hypothesis for tracks
pub const MASS_PION_CHARGED: f64 = 0.13957039;

/// A selected particle, with four-momentum in the order (E, px, py, pz)
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct Particle {
    pub id: ParticleID,
    pub p: [f64; 4],
    /// Opaque index of the originating track or generator record
    pub tag: usize,
    pub pt: f64,
    pub eta: f64,
    pub y: f64,
    pub phi: f64,
}

impl Particle {
    pub fn new(id: ParticleID, p: [f64; 4], tag: usize) -> Self {
        Particle {
            id,
            p,
            tag,
            pt: pt(&p),
            eta: eta(&p),
            y: y(&p),
            phi: phi(&p),
        }
    }

    /// Build a particle from its three-momentum and a mass hypothesis
    pub fn with_mass(
        id: ParticleID,
        [px, py, pz]: [f64; 3],
        mass: f64,
        tag: usize,
    ) -> Self {
        let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
        Self::new(id, [e, px, py, pz], tag)
    }

    pub fn m2(&self) -> f64 {
        m2(&self.p)
    }
}

pub fn y(p: &[f64; 4]) -> f64 {
    (p[3] / p[0]).atanh()
}

pub fn phi(p: &[f64; 4]) -> f64 {
    p[2].atan2(p[1])
}

pub fn pt2(p: &[f64; 4]) -> f64 {
    p[1] * p[1] + p[2] * p[2]
}

pub fn pt(p: &[f64; 4]) -> f64 {
    pt2(p).sqrt()
}

pub fn eta(p: &[f64; 4]) -> f64 {
    pseudorapidity([p[1], p[2], p[3]])
}

pub fn m2(p: &[f64; 4]) -> f64 {
    p[0] * p[0] - p[1] * p[1] - p[2] * p[2] - p[3] * p[3]
}

/// Pseudorapidity of a three-vector
///
/// Vectors along the beam axis get ±10¹⁰, vectors of zero length get 0.
pub fn pseudorapidity([px, py, pz]: [f64; 3]) -> f64 {
    let pt = (px * px + py * py).sqrt();
    if pt == 0. {
        if pz == 0. {
            0.
        } else {
            pz.signum() * 1e10
        }
    } else {
        (pz / pt).asinh()
    }
}

pub fn add(p: &[f64; 4], q: &[f64; 4]) -> [f64; 4] {
    [p[0] + q[0], p[1] + q[1], p[2] + q[2], p[3] + q[3]]
}
