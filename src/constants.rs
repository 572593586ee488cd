// Internal constants.

/// Number of distinct color classes the LUT can classify a pixel into.
pub const COLOR_COUNT: usize = 10;

/// Largest resolution the core will accept. Bounds preallocation, not a
/// per-frame constant — `MAX_RUNS`/`MAX_REGIONS` are derived per instance
/// from the configured resolution, see [`crate::pipeline::Pipeline::open`].
pub const MAX_WIDTH: u32 = 1280;
pub const MAX_HEIGHT: u32 = 1024;

/// Radix sort digit width.
pub const CMV_RBITS: u32 = 6;
pub const CMV_RADIX: usize = 1 << CMV_RBITS;
pub const CMV_RMASK: u32 = (CMV_RADIX - 1) as u32;

/// `min_area` value that disables a color class.
pub const DISABLED_MIN_AREA: u32 = u32::MAX;

/// Seconds the frame source is allowed to block on a dequeue before the
/// core surfaces a device-I/O error.
pub const DEQUEUE_TIMEOUT_SECS: u64 = 2;
