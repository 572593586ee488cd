//! The blob reporter: projects a sorted region list through the polar
//! lookup tables into the `(n, 9)` table a caller receives from
//! `get_blobs`.

use crate::polar::PolarTables;
use crate::region::{RegionArena, RegionId};

/// Column order of a blob report row.
pub const COLUMNS: usize = 9;

/// A `(rows, 9)` table of `u16` blob statistics, one row per blob,
/// columns `(r, phi, area, cen_x, cen_y, x1, x2, y1, y2)`. Row-major,
/// allocated fresh per call and owned by the caller.
pub struct BlobTable {
    rows: usize,
    data: Vec<u16>,
}

impl BlobTable {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn row(&self, i: usize) -> &[u16] {
        &self.data[i * COLUMNS..(i + 1) * COLUMNS]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }
}

/// Builds the report for a color's already-sorted region list.
///
/// `r`/`phi` are read from `polar` at pixel index
/// `round(cen_y)*w + round(cen_x)`; `area` is saturated to `u16::MAX`.
pub fn build_report(
    regions: &RegionArena,
    mut head: Option<RegionId>,
    w: u32,
    polar: &PolarTables,
) -> BlobTable {
    let mut data = Vec::new();
    let mut rows = 0usize;

    while let Some(id) = head {
        let region = regions.get(id);
        let cen_x = region.cen_x.round() as u32;
        let cen_y = region.cen_y.round() as u32;
        let index = (cen_y as usize) * (w as usize) + cen_x as usize;
        let (r, phi) = polar.at(index);

        data.push(r);
        data.push(phi);
        data.push(region.area.min(u16::MAX as u32) as u16);
        data.push(cen_x as u16);
        data.push(cen_y as u16);
        data.push(region.x1 as u16);
        data.push(region.x2 as u16);
        data.push(region.y1 as u16);
        data.push(region.y2 as u16);

        rows += 1;
        head = region.next;
    }

    BlobTable { rows, data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_zero_rows() {
        let regions = RegionArena::with_capacity(1);
        let polar = PolarTables::new(4, 4);
        let table = build_report(&regions, None, 4, &polar);
        assert_eq!(table.rows(), 0);
    }

    #[test]
    fn centroid_is_projected_through_polar_tables() {
        let w = 4u32;
        let mut regions = RegionArena::with_capacity(1);
        let id = regions.allocate(1, 0).unwrap();
        {
            let region = regions.get_mut(id);
            region.area = 10;
            region.cen_x = 2.0;
            region.cen_y = 1.0;
            region.x1 = 1;
            region.x2 = 3;
            region.y1 = 0;
            region.y2 = 2;
            region.next = None;
        }
        let mut polar = PolarTables::new(w, 4);
        let index = (1 * w + 2) as usize;
        let mut r_table = vec![0u16; (w * 4) as usize];
        let mut phi_table = vec![0u16; (w * 4) as usize];
        r_table[index] = 77;
        phi_table[index] = 200;
        polar.install(&r_table, &phi_table);

        let table = build_report(&regions, Some(id), w, &polar);
        assert_eq!(table.rows(), 1);
        assert_eq!(
            table.row(0),
            &[77, 200, 10, 2, 1, 1, 3, 0, 2]
        );
    }

    #[test]
    fn saturates_area_at_u16_max() {
        let mut regions = RegionArena::with_capacity(1);
        let id = regions.allocate(1, 0).unwrap();
        regions.get_mut(id).area = 100_000;
        let polar = PolarTables::new(4, 4);
        let table = build_report(&regions, Some(id), 4, &polar);
        assert_eq!(table.row(0)[2], u16::MAX);
    }
}
