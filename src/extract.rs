//! Single forward pass over labeled runs, accumulating per-region area,
//! bounding box, and centroid statistics.

use crate::color_class::ColorClasses;
use crate::region::RegionArena;
use crate::run::RunArena;

/// Sum of x-coordinates over a run of `width` pixels starting at `x`:
/// `w*(2x + w - 1) / 2`.
#[inline]
fn range_sum(x: u16, width: u16) -> f64 {
    let x = x as i64;
    let width = width as i64;
    (width * (2 * x + width - 1)) as f64 / 2.0
}

/// Walks `runs` (already labeled by [`crate::components::connect_components`])
/// and builds `regions`, one per 4-connected group of enabled-class runs.
///
/// Stops early, leaving `regions` internally consistent, if capacity is
/// exceeded: the partial result keeps every region built so far, with no
/// half-initialized entry.
pub fn extract_regions(runs: &mut RunArena, colors: &ColorClasses, regions: &mut RegionArena) {
    regions.clear();

    let num = runs.len();
    for i in 0..num {
        let r = *runs.get(i as u32);
        if !colors.is_enabled(r.color) {
            continue;
        }

        if r.parent == i as u32 {
            // Root: allocate a new region.
            let b = match regions.allocate(r.color, i as u32) {
                Some(b) => b,
                None => break,
            };
            runs.get_mut(i as u32).parent = b;

            let region = regions.get_mut(b);
            region.area = r.width as u32;
            region.x1 = r.x as i32;
            region.y1 = r.y as i32;
            region.x2 = r.x as i32 + r.width as i32;
            region.y2 = r.y as i32;
            region.cen_x = range_sum(r.x, r.width);
            region.cen_y = r.y as f64 * r.width as f64;

            if regions.is_full() {
                break;
            }
        } else {
            // Child: resolve the owning region through the already
            // root-rewritten parent (roots always precede their
            // children in scan order).
            let root_run = r.parent;
            let b = runs.get(root_run).parent;
            runs.get_mut(i as u32).parent = b;

            let region = regions.get_mut(b);
            region.area += r.width as u32;
            region.x2 = region.x2.max(r.x as i32 + r.width as i32);
            region.x1 = region.x1.min(r.x as i32);
            region.y2 = r.y as i32;
            region.cen_x += range_sum(r.x, r.width);
            region.cen_y += r.y as f64 * r.width as f64;

            let prev_tail = region.iterator_id;
            region.iterator_id = i as u32;
            runs.get_mut(prev_tail).next = Some(i as u32);
        }
    }

    for region in regions.iter_mut() {
        let area = region.area as f64;
        region.cen_x /= area;
        region.cen_y /= area;
        runs.get_mut(region.iterator_id).next = None;
        region.iterator_id = 0;
        region.x2 -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_class::ColorClasses;
    use crate::components::connect_components;
    use crate::encoder::encode_runs;

    fn classes_enabling(colors: &[(u8, u32)]) -> ColorClasses {
        let mut c = ColorClasses::new(10);
        for &(color, min_area) in colors {
            c.set_min_area(color, min_area);
        }
        c
    }

    fn pipeline(segmented: &mut [u8], w: u32, h: u32, colors: &ColorClasses) -> (RunArena, RegionArena) {
        let mut runs = RunArena::with_capacity(4096);
        encode_runs(segmented, w, h, colors, &mut runs);
        connect_components(&mut runs, colors);
        let mut regions = RegionArena::with_capacity(1024);
        extract_regions(&mut runs, colors, &mut regions);
        (runs, regions)
    }

    #[test]
    fn two_by_two_block_yields_area_four_blob() {
        // 4x4 frame, segmented = [[1,1,0,0],[1,1,0,0],[0,0,0,0],[0,0,0,0]]
        #[rustfmt::skip]
        let mut segmented: Vec<u8> = vec![
            1, 1, 0, 0,
            1, 1, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0,
        ];
        let colors = classes_enabling(&[(1, 1)]);
        let (_runs, regions) = pipeline(&mut segmented, 4, 4, &colors);
        let blobs: Vec<_> = regions.iter().filter(|r| r.color == 1).collect();
        assert_eq!(blobs.len(), 1);
        let b = blobs[0];
        assert_eq!(b.area, 4);
        assert_eq!((b.x1, b.x2, b.y1, b.y2), (0, 1, 0, 1));
        assert!((b.cen_x - 0.5).abs() < 1e-9);
        assert!((b.cen_y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn full_single_color_frame_yields_one_region_spanning_whole_image() {
        let w = 4u32;
        let h = 3u32;
        let mut segmented = vec![1u8; (w * h) as usize + 1];
        let colors = classes_enabling(&[(1, 1)]);
        let (_runs, regions) = pipeline(&mut segmented, w, h, &colors);
        assert_eq!(regions.len(), 1);
        let b = regions.get(0);
        assert_eq!(b.area, w * h);
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (0, 0, (w - 1) as i32, (h - 1) as i32));
        assert!((b.cen_x - (w - 1) as f64 / 2.0).abs() < 1e-9);
        assert!((b.cen_y - (h - 1) as f64 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn cross_shaped_region_has_single_area_five_blob() {
        // 3x3 cross of class 1: area 5, bbox (0,0)-(2,2), centroid (1,1)
        #[rustfmt::skip]
        let mut segmented: Vec<u8> = vec![
            0, 1, 0,
            1, 1, 1,
            0, 1, 0,
            0,
        ];
        let colors = classes_enabling(&[(1, 1), (0, 1)]);
        let (_runs, regions) = pipeline(&mut segmented, 3, 3, &colors);
        let blobs: Vec<_> = regions.iter().filter(|r| r.color == 1).collect();
        assert_eq!(blobs.len(), 1);
        let b = blobs[0];
        assert_eq!(b.area, 5);
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (0, 0, 2, 2));
        assert!((b.cen_x - 1.0).abs() < 1e-9);
        assert!((b.cen_y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn run_threading_matches_area() {
        #[rustfmt::skip]
        let mut segmented: Vec<u8> = vec![
            1, 1, 0, 0,
            1, 1, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0,
        ];
        let colors = classes_enabling(&[(1, 1)]);
        let (runs, regions) = pipeline(&mut segmented, 4, 4, &colors);
        let region = regions.iter().find(|r| r.color == 1).unwrap();
        let mut cursor = Some(region.run_start);
        let mut total_width = 0u32;
        let mut count = 0;
        while let Some(id) = cursor {
            let run = runs.get(id);
            total_width += run.width as u32;
            cursor = run.next;
            count += 1;
        }
        assert_eq!(total_width, region.area);
        assert_eq!(count, 2);
    }
}
