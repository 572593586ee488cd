//! 4-connected union-find labeling over runs, via a lock-step two-row
//! sweep.
//!
//! This code is complicated. A correct implementation, but minor changes
//! can easily cause big problems — understand tree-based union-find with
//! path compression before touching it.

use crate::color_class::ColorClasses;
use crate::run::RunArena;

/// Labels `runs` in place so that every run's `parent` names a single
/// canonical ancestor per 4-connected same-class region, one hop from
/// the root after this returns.
pub fn connect_components(runs: &mut RunArena, colors: &ColorClasses) {
    let map = runs.as_mut_slice();
    let num = map.len();
    if num == 0 {
        return;
    }

    // l2 starts on the first scanline, l1 starts on the second.
    let mut l2 = 0usize;
    let mut l1 = 1usize;
    while l1 < num && map[l1].y == 0 {
        l1 += 1;
    }

    if l1 >= num {
        // Single-row image: nothing to connect, compression is a no-op
        // (every run is already its own root).
        return;
    }

    let mut r1 = map[l1];
    let mut r2 = map[l2];
    let mut s = l1;

    while l1 < num {
        if r1.color == r2.color && colors.is_enabled(r1.color) {
            let overlap = (r2.x <= r1.x && r1.x < r2.x + r2.width)
                || (r1.x <= r2.x && r2.x < r1.x + r1.width);
            if overlap {
                if s != l1 {
                    // First overlap seen for this r1: inherit r2's parent.
                    map[l1].parent = r2.parent;
                    r1.parent = r2.parent;
                    s = l1;
                } else if r1.parent != r2.parent {
                    // Union: walk each parent up to its root.
                    let mut i = r1.parent as usize;
                    while i != map[i].parent as usize {
                        i = map[i].parent as usize;
                    }
                    let mut j = r2.parent as usize;
                    while j != map[j].parent as usize {
                        j = map[j].parent as usize;
                    }

                    let k = i.min(j) as u32;
                    map[i].parent = k;
                    map[j].parent = k;
                    map[l1].parent = k;
                    map[l2].parent = k;
                    r1.parent = k;
                    r2.parent = k;
                }
            }
        }

        let d = (r2.x as i32 + r2.width as i32) - (r1.x as i32 + r1.width as i32);
        if d >= 0 {
            l1 += 1;
            if l1 < num {
                r1 = map[l1];
            }
        }
        if d <= 0 {
            l2 += 1;
            if l2 < num {
                r2 = map[l2];
            }
        }
    }

    // Final compression: one hop suffices since parents always point to
    // a smaller index whose own compressed update has already landed.
    for i in 0..num {
        let p = map[i].parent as usize;
        map[i].parent = map[p].parent;
    }
}
