//! Redistributes finished regions into per-color singly-linked lists,
//! dropping anything under that color's minimum area.

use crate::color_class::ColorClasses;
use crate::region::RegionArena;

/// Clears every color's list, then pushes each region meeting its
/// color's `min_area` onto the front of that color's list (reverse
/// insertion order — most-recently-seen region first). Returns the
/// maximum area across all surviving regions (`0` if none survive),
/// used to size the radix sort's pass count.
pub fn separate_regions(regions: &mut RegionArena, colors: &mut ColorClasses) -> u32 {
    for class in colors.iter_mut() {
        class.list_head = None;
        class.count = 0;
    }

    let mut max_area = 0u32;
    let ids: Vec<u32> = (0..regions.len() as u32).collect();
    for id in ids {
        let color = regions.get(id).color;
        let area = regions.get(id).area;
        let class = match colors.get_mut(color) {
            Some(c) => c,
            None => continue,
        };
        if area >= class.min_area {
            max_area = max_area.max(area);
            class.count += 1;
            regions.get_mut(id).next = class.list_head;
            class.list_head = Some(id);
        }
    }
    max_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_class::ColorClasses;

    fn region_with(regions: &mut RegionArena, color: u8, area: u32) -> u32 {
        let id = regions.allocate(color, 0).unwrap();
        regions.get_mut(id).area = area;
        id
    }

    #[test]
    fn filters_by_min_area_and_tracks_max() {
        let mut regions = RegionArena::with_capacity(8);
        region_with(&mut regions, 1, 5);
        region_with(&mut regions, 1, 50);
        region_with(&mut regions, 2, 3);

        let mut colors = ColorClasses::new(10);
        colors.set_min_area(1, 10);
        colors.set_min_area(2, 1);

        let max_area = separate_regions(&mut regions, &mut colors);
        assert_eq!(max_area, 50);
        assert_eq!(colors.get(1).unwrap().count, 1);
        assert_eq!(colors.get(2).unwrap().count, 1);
    }

    #[test]
    fn list_is_reverse_insertion_order() {
        let mut regions = RegionArena::with_capacity(8);
        let a = region_with(&mut regions, 1, 5);
        let b = region_with(&mut regions, 1, 6);

        let mut colors = ColorClasses::new(10);
        colors.set_min_area(1, 1);
        separate_regions(&mut regions, &mut colors);

        let head = colors.get(1).unwrap().list_head.unwrap();
        assert_eq!(head, b);
        assert_eq!(regions.get(head).next, Some(a));
    }
}
