//! Per-color class state: the list of regions belonging to a color, its
//! area threshold, and its display name.

use crate::constants::DISABLED_MIN_AREA;
use crate::region::RegionId;

/// State tracked per color class. `list_head` threads through
/// [`crate::region::Region::next`]; it is rebuilt every frame by
/// [`crate::splitter::separate_regions`].
pub struct ColorClass {
    pub list_head: Option<RegionId>,
    pub count: u32,
    pub min_area: u32,
    pub class_index: u8,
    pub name: String,
}

impl ColorClass {
    fn new(class_index: u8) -> Self {
        Self {
            list_head: None,
            count: 0,
            min_area: DISABLED_MIN_AREA,
            class_index,
            name: format!("color{}", class_index),
        }
    }

    /// A disabled class participates in neither run encoding nor region
    /// construction.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.min_area < DISABLED_MIN_AREA
    }
}

/// Fixed `COLOR_COUNT`-sized table of color class state.
pub struct ColorClasses {
    classes: Vec<ColorClass>,
}

impl ColorClasses {
    pub fn new(count: usize) -> Self {
        Self {
            classes: (0..count).map(|i| ColorClass::new(i as u8)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, color: u8) -> Option<&ColorClass> {
        self.classes.get(color as usize)
    }

    pub fn get_mut(&mut self, color: u8) -> Option<&mut ColorClass> {
        self.classes.get_mut(color as usize)
    }

    #[inline]
    pub fn is_enabled(&self, color: u8) -> bool {
        self.classes
            .get(color as usize)
            .map(ColorClass::is_enabled)
            .unwrap_or(false)
    }

    pub fn set_min_area(&mut self, color: u8, min_area: u32) -> bool {
        match self.classes.get_mut(color as usize) {
            Some(c) => {
                c.min_area = min_area;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorClass> {
        self.classes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColorClass> {
        self.classes.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disabled() {
        let c = ColorClasses::new(10);
        assert!(!c.is_enabled(0));
    }

    #[test]
    fn set_min_area_enables() {
        let mut c = ColorClasses::new(10);
        c.set_min_area(2, 5);
        assert!(c.is_enabled(2));
        assert!(!c.is_enabled(3));
    }

    #[test]
    fn disabled_sentinel_roundtrips() {
        let mut c = ColorClasses::new(10);
        c.set_min_area(2, 5);
        c.set_min_area(2, DISABLED_MIN_AREA);
        assert!(!c.is_enabled(2));
    }

    #[test]
    fn out_of_range_color_is_ignored() {
        let mut c = ColorClasses::new(10);
        assert!(!c.set_min_area(10, 5));
    }
}
