//! Seeded material band table for terracotta-style striping.

use strata_utils::random::{Random, RandomSource};

use crate::material::MaterialId;

/// Number of band entries; Y wraps around this modulus.
pub const BAND_COUNT: usize = 192;

/// Builds the band table: the base material seeded with single stripes,
/// then thicker runs of the variant materials dropped over them.
///
/// Pure function of the random source state, so the table is a seed
/// derivative like every noise.
#[must_use]
pub fn make_bands(
    random: &mut RandomSource,
    base: MaterialId,
    variants: &[MaterialId],
) -> Box<[MaterialId]> {
    let mut bands = vec![base; BAND_COUNT];

    if variants.is_empty() {
        return bands.into_boxed_slice();
    }

    // Sparse single stripes.
    let mut index = 0usize;
    while index < bands.len() {
        index += 1 + random.next_i32_bounded(5) as usize;
        if index >= bands.len() {
            break;
        }
        let variant = variants[random.next_i32_bounded(variants.len() as i32) as usize];
        bands[index] = variant;
    }

    // Thicker runs of each variant in turn.
    for &variant in variants {
        let run_count = random.next_i32_bounded(4) + 2;
        for _ in 0..run_count {
            let thickness = 1 + random.next_i32_bounded(2) as usize;
            let start = random.next_i32_bounded(BAND_COUNT as i32) as usize;
            for band in bands.iter_mut().skip(start).take(thickness) {
                *band = variant;
            }
        }
    }

    bands.into_boxed_slice()
}

/// Looks up the band for a Y, offset by the column's band shift.
#[inline]
#[must_use]
pub fn band_at(bands: &[MaterialId], y: i32, offset: i32) -> MaterialId {
    let index = (y + offset).rem_euclid(bands.len() as i32) as usize;
    bands[index]
}
