//! Exercises `analyse()` over a synthetic 640x480 stream at representative
//! load. No internal timing is collected — wrap invocation in an external
//! tool (`perf`, `hyperfine`) to measure throughput, matching how the
//! decoder benchmark this is modeled on is run.

extern crate segvision;

use segvision::frame_source::MemoryFrameSource;
use segvision::Pipeline;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FRAME_COUNT: usize = 300;

/// Builds a synthetic YUV 4:2:2 frame: a checkerboard of two classes over
/// an unclassified background, representative of a populated scene.
fn synthetic_frame() -> Vec<u8> {
    let mut frame = vec![0u8; 2 * (WIDTH as usize) * (HEIGHT as usize)];
    for y in 0..HEIGHT as usize {
        for pair in 0..(WIDTH as usize) / 2 {
            let base = 2 * (y * WIDTH as usize) + 4 * pair;
            let on = (y / 16 + pair / 16) % 2 == 0;
            let (y0, u, y1, v) = if on { (200, 90, 200, 90) } else { (16, 128, 16, 128) };
            frame[base] = y0;
            frame[base + 1] = u;
            frame[base + 2] = y1;
            frame[base + 3] = v;
        }
    }
    frame
}

fn main() {
    let mut pipeline = Pipeline::new(MemoryFrameSource::new());
    pipeline
        .open("bench", WIDTH, HEIGHT, 30)
        .expect("cannot open pipeline");
    pipeline
        .set_color_min_area(1, 4)
        .expect("color index out of range");

    let mut lut = vec![0xFFu8; 1 << 24];
    let key = |y: u8, u: u8, v: u8| (y as usize) | ((u as usize) << 8) | ((v as usize) << 16);
    lut[key(200, 90, 90)] = 1;
    pipeline.set_colors(&lut);

    let frame = synthetic_frame();

    for _ in 0..FRAME_COUNT {
        pipeline
            .source_mut()
            .push_frame(&frame)
            .expect("frame does not fit the configured resolution");
        pipeline.analyse().expect("analyse failed");
    }

    println!("analysed {} frames at {}x{}", FRAME_COUNT, WIDTH, HEIGHT);
}
