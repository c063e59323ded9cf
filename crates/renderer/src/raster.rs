//! Rasterization of tile bin sets through a color ramp.

use toe_common::{ColorRamp, TileBinSet, ToeResult};

use crate::png;

/// Fill an RGBA raster from a bin set. Pixels without a bin stay fully
/// transparent, so an empty bin set yields the "no lightning here" tile.
pub fn rasterize(bins: &TileBinSet, ramp: &ColorRamp) -> Vec<u8> {
    let size = bins.tile_size() as usize;
    let mut pixels = vec![0u8; size * size * 4];

    for (key, energy_fj) in bins.iter() {
        let (px, py) = bins.pixel_for(key);
        // Keys at or beyond tile_size^2 decode to a row outside the raster
        if py as usize >= size {
            continue;
        }
        let color = ramp.color_for(energy_fj);

        let offset = (py as usize * size + px as usize) * 4;
        pixels[offset] = color.r;
        pixels[offset + 1] = color.g;
        pixels[offset + 2] = color.b;
        pixels[offset + 3] = color.a;
    }

    pixels
}

/// Render a bin set to PNG bytes.
///
/// Pure and deterministic: identical bin sets and ramps always produce
/// byte-identical output.
pub fn render_tile(bins: &TileBinSet, ramp: &ColorRamp) -> ToeResult<Vec<u8>> {
    let size = bins.tile_size() as usize;
    let pixels = rasterize(bins, ramp);
    png::encode_rgba(&pixels, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toe_common::Rgba;

    #[test]
    fn test_rasterize_writes_bin_pixels() {
        let mut bins = TileBinSet::new(256);
        bins.accumulate(3, 2, 300.0);

        let ramp = ColorRamp::default_toe();
        let pixels = rasterize(&bins, &ramp);

        // 300 fJ falls under the 500 stop
        let expected = Rgba::new(37, 52, 148, 220);
        let offset = (2 * 256 + 3) * 4;
        assert_eq!(
            &pixels[offset..offset + 4],
            &[expected.r, expected.g, expected.b, expected.a]
        );

        // A neighbor stays transparent
        let neighbor = (2 * 256 + 4) * 4;
        assert_eq!(&pixels[neighbor..neighbor + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_rasterize_empty_is_transparent() {
        let bins = TileBinSet::new(256);
        let pixels = rasterize(&bins, &ColorRamp::default_toe());
        assert!(pixels.iter().all(|&b| b == 0));
    }
}
