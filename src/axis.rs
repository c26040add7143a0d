use log::warn;
use strum::Display;

use crate::error::InvalidGeometry;
use crate::particle::pseudorapidity;

/// Which of the two perpendicular solutions to pick
#[derive(Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Sign {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
}

impl Sign {
    pub fn value(self) -> f64 {
        match self {
            Sign::Plus => 1.,
            Sign::Minus => -1.,
        }
    }
}

/// A reference direction, not a physical particle
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Axis(pub [f64; 3]);

impl Axis {
    pub const ZERO: Axis = Axis([0.; 3]);

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    pub fn eta(&self) -> f64 {
        pseudorapidity(self.0)
    }

    pub fn phi(&self) -> f64 {
        self.y().atan2(self.x())
    }

    pub fn dot(&self, other: &Axis) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }
}

impl From<[f64; 3]> for Axis {
    fn from(p: [f64; 3]) -> Self {
        Self(p)
    }
}

/// Axis `u` with `u_z = p_z` and `u_T · p_T = -p_z²`
///
/// The two signs give the two solutions. Together with `u_z = p_z`
/// this makes `u` orthogonal to `p` with the same length.
///
/// Without transverse momentum the result is the zero axis. If `px`
/// or `py` vanish the solution is computed directly; this can give
/// NaN components when `|p_z|` exceeds the transverse momentum.
pub fn try_perpendicular_axis(
    p: &Axis,
    sign: Sign,
) -> Result<Axis, InvalidGeometry> {
    let [px, py, pz] = p.0;
    let sign = sign.value();

    let px2 = px * px;
    let py2 = py * py;
    let pz2 = pz * pz;
    let pz4 = pz2 * pz2;

    if px == 0. && py == 0. {
        return Ok(Axis::ZERO);
    }
    if px == 0. {
        let ux = sign * (py2 - pz4 / py2).sqrt();
        let uy = -pz2 / py;
        return Ok(Axis([ux, uy, pz]));
    }
    if py == 0. {
        let ux = -pz2 / px;
        let uy = sign * (px2 - pz4 / px2).sqrt();
        return Ok(Axis([ux, uy, pz]));
    }

    let a = px2 + py2;
    let b = 2. * px * pz2;
    let c = pz4 - py2 * py2 - px2 * py2;
    let delta = b * b - 4. * a * c;
    if delta < 0. || a == 0. {
        return Err(InvalidGeometry { delta, a });
    }

    let ux = (-b + sign * delta.sqrt()) / (2. * a);
    let uy = (-pz2 - px * ux) / py;
    Ok(Axis([ux, uy, pz]))
}

/// Like [try_perpendicular_axis], but invalid geometry gives the zero axis
pub fn perpendicular_axis(p: &Axis, sign: Sign) -> Axis {
    try_perpendicular_axis(p, sign).unwrap_or_else(|err| {
        warn!("{err}");
        Axis::ZERO
    })
}

/// The two underlying-event axes of a jet with momentum `p`
pub fn ue_axes(p: &Axis) -> [Axis; 2] {
    [
        perpendicular_axis(p, Sign::Plus),
        perpendicular_axis(p, Sign::Minus),
    ]
}
