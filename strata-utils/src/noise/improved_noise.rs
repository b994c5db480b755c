//! Single-octave improved gradient noise.

use crate::math::{floor, lerp3, smoothstep};
use crate::random::{Random, RandomSource};

/// The 16 gradient vectors used in the corner dot products.
const GRADIENT: [[i32; 3]; 16] = [
    [1, 1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, -1, 1],
    [0, 1, -1],
    [0, -1, -1],
    [1, 1, 0],
    [0, -1, 1],
    [-1, 1, 0],
    [0, -1, -1],
];

/// A single gradient-noise octave.
///
/// Each instance owns a shuffled permutation table and a random coordinate
/// offset, both drawn from the constructing source. The offset decorrelates
/// octaves that share a permutation layout.
#[derive(Debug, Clone)]
pub struct ImprovedNoise {
    /// Permutation table.
    p: [u8; 256],
    /// X offset applied to sample coordinates.
    pub xo: f64,
    /// Y offset applied to sample coordinates.
    pub yo: f64,
    /// Z offset applied to sample coordinates.
    pub zo: f64,
}

impl ImprovedNoise {
    /// Creates a new octave, consuming 3 doubles and 256 bounded ints from
    /// the source.
    pub fn new(random: &mut RandomSource) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut p = [0u8; 256];
        for (i, v) in p.iter_mut().enumerate() {
            *v = i as u8;
        }
        // Fisher-Yates shuffle
        for i in 0..256 {
            let offset = random.next_i32_bounded((256 - i) as i32) as usize;
            p.swap(i, i + offset);
        }

        Self { p, xo, yo, zo }
    }

    /// Samples the noise at the given coordinates.
    #[inline]
    #[must_use]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise_smeared(x, y, z, 0.0, 0.0)
    }

    /// Samples with vertical smearing, used by the blended terrain noise.
    ///
    /// When `y_scale` is nonzero, the fractional y is snapped down to a
    /// multiple of `y_scale` (bounded by `y_limit` when that is smaller),
    /// which stretches terrain features vertically.
    #[must_use]
    pub fn noise_smeared(&self, x: f64, y: f64, z: f64, y_scale: f64, y_limit: f64) -> f64 {
        let x = x + self.xo;
        let y = y + self.yo;
        let z = z + self.zo;

        let xf = floor(x);
        let yf = floor(y);
        let zf = floor(z);

        let xr = x - f64::from(xf);
        let yr = y - f64::from(yf);
        let zr = z - f64::from(zf);

        let y_snap = if y_scale != 0.0 {
            let limit = if y_limit >= 0.0 && y_limit < yr {
                y_limit
            } else {
                yr
            };
            (limit / y_scale + 1.0e-7_f64).floor() * y_scale
        } else {
            0.0
        };

        self.sample_and_lerp(xf, yf, zf, xr, yr - y_snap, zr, yr)
    }

    #[inline]
    const fn p(&self, x: i32) -> usize {
        self.p[(x & 255) as usize] as usize
    }

    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    fn sample_and_lerp(
        &self,
        x: i32,
        y: i32,
        z: i32,
        xr: f64,
        yr: f64,
        zr: f64,
        yr_weight: f64,
    ) -> f64 {
        let x0 = self.p(x);
        let x1 = self.p(x + 1);
        let xy00 = self.p(x0 as i32 + y);
        let xy01 = self.p(x0 as i32 + y + 1);
        let xy10 = self.p(x1 as i32 + y);
        let xy11 = self.p(x1 as i32 + y + 1);

        let d000 = grad_dot(self.p(xy00 as i32 + z), xr, yr, zr);
        let d100 = grad_dot(self.p(xy10 as i32 + z), xr - 1.0, yr, zr);
        let d010 = grad_dot(self.p(xy01 as i32 + z), xr, yr - 1.0, zr);
        let d110 = grad_dot(self.p(xy11 as i32 + z), xr - 1.0, yr - 1.0, zr);
        let d001 = grad_dot(self.p(xy00 as i32 + z + 1), xr, yr, zr - 1.0);
        let d101 = grad_dot(self.p(xy10 as i32 + z + 1), xr - 1.0, yr, zr - 1.0);
        let d011 = grad_dot(self.p(xy01 as i32 + z + 1), xr, yr - 1.0, zr - 1.0);
        let d111 = grad_dot(self.p(xy11 as i32 + z + 1), xr - 1.0, yr - 1.0, zr - 1.0);

        // The interpolation weight along y uses the unsnapped fraction so
        // smearing shifts the gradients, not the blend.
        let x_alpha = smoothstep(xr);
        let y_alpha = smoothstep(yr_weight);
        let z_alpha = smoothstep(zr);

        lerp3(
            x_alpha, y_alpha, z_alpha, d000, d100, d010, d110, d001, d101, d011, d111,
        )
    }
}

#[inline]
fn grad_dot(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let g = &GRADIENT[hash & 15];
    f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z
}
