//! Compresses each scanline of the classified image into maximal
//! same-class runs.

use crate::color_class::ColorClasses;
use crate::run::RunArena;

/// Encodes `segmented` into `runs`, one run per maximal same-class span,
/// rows top-to-bottom and runs within a row left-to-right.
///
/// `segmented` must be `w*h + 1` bytes: the trailing byte is scratch
/// space for the sentinel trick described below, never part of the
/// visible image (contrast with the original source, which borrows the
/// first pixel of the *next* row for this and relies on an
/// over-allocated buffer to cover the last row — see DESIGN.md's
/// `set_resolution` bugfix note. The extra scratch byte here gets the
/// same effect without reintroducing that bug).
///
/// A run is kept only if its class is enabled, or if the run was cut off
/// by reaching `x >= w` (so every row contributes at least one recorded
/// run, keeping row boundaries detectable from `y` alone). Note this
/// means a maximal run of the *unclassified* sentinel value that happens
/// to butt up against the row-boundary sentinel byte (also unclassified)
/// will not stop scanning at the row edge — this mirrors the original
/// encoder's reliance on the sentinel being a value no real classified
/// pixel takes; a LUT that leaves large regions of the color space
/// unclassified can see runs bleed across a row in both implementations.
pub fn encode_runs(segmented: &mut [u8], w: u32, h: u32, colors: &ColorClasses, runs: &mut RunArena) {
    let w = w as usize;
    let h = h as usize;
    debug_assert_eq!(segmented.len(), w * h + 1);

    runs.clear();

    let mut save = segmented[0];

    'rows: for y in 0..h {
        let row_start = y * w;
        segmented[row_start] = save;
        save = segmented[row_start + w];
        segmented[row_start + w] = 0xFF;

        let mut x = 0usize;
        while x < w {
            let m = segmented[row_start + x];
            let l = x;
            while segmented[row_start + x] == m {
                x += 1;
            }

            if colors.is_enabled(m) || x >= w {
                let width = (x - l) as u16;
                if !runs.push(y as u16, l as u16, width, m) {
                    segmented[row_start + w] = save;
                    break 'rows;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DISABLED_MIN_AREA;

    fn classes_enabling(colors: &[u8]) -> ColorClasses {
        let mut c = ColorClasses::new(10);
        for &color in colors {
            c.set_min_area(color, 1);
        }
        c
    }

    #[test]
    fn single_row_two_runs() {
        let w = 4;
        let h = 1;
        let mut segmented = vec![1u8, 1, 0, 0, 0]; // + scratch byte
        let colors = classes_enabling(&[1, 0]);
        let mut runs = RunArena::with_capacity(16);
        encode_runs(&mut segmented, w, h, &colors, &mut runs);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs.get(0).x, runs.get(0).width, runs.get(0).color), (0, 2, 1));
        assert_eq!((runs.get(1).x, runs.get(1).width, runs.get(1).color), (2, 2, 0));
    }

    #[test]
    fn disabled_run_not_emitted_unless_row_terminator() {
        let w = 4;
        let h = 1;
        let mut segmented = vec![2u8, 2, 2, 2, 0];
        let mut colors = ColorClasses::new(10);
        colors.set_min_area(2, DISABLED_MIN_AREA);
        let mut runs = RunArena::with_capacity(16);
        encode_runs(&mut segmented, w, h, &colors, &mut runs);
        // The whole row is one disabled-class run, retained only because
        // it terminates the row.
        assert_eq!(runs.len(), 1);
        assert_eq!(runs.get(0).width, 4);
    }

    #[test]
    fn two_rows_each_terminate() {
        let w = 2;
        let h = 2;
        let mut segmented = vec![1u8, 1, 1, 1, 0];
        let colors = classes_enabling(&[1]);
        let mut runs = RunArena::with_capacity(16);
        encode_runs(&mut segmented, w, h, &colors, &mut runs);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs.get(0).y, 0);
        assert_eq!(runs.get(1).y, 1);
    }

    #[test]
    fn overflow_stops_and_preserves_earlier_runs() {
        let w = 4;
        let h = 1;
        let mut segmented = vec![1u8, 2, 3, 4, 0];
        let colors = classes_enabling(&[1, 2, 3, 4]);
        let mut runs = RunArena::with_capacity(2);
        encode_runs(&mut segmented, w, h, &colors, &mut runs);
        assert_eq!(runs.len(), 2);
        assert!(runs.overflowed());
    }
}
