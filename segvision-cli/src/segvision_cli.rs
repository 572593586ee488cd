//! Drives the segmentation pipeline against a raw YUV 4:2:2 file and a
//! color table/active-mask/polar-table file set, printing the blob
//! report for one requested color.

// segvision crate
extern crate segvision;

// CLI crates
extern crate clap;

// Byteorder crate
extern crate byteorder;

// Logging crates
extern crate log;
extern crate simple_logger;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use clap::{App, Arg};

use segvision::frame_source::MemoryFrameSource;
use segvision::Pipeline;

/// Pipeline parameters gathered from the command line.
struct CliParams {
    width: u32,
    height: u32,
    fps: u32,
    color: u8,
    min_area: u32,
}

/// Reads a whole file into memory.
fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Reads a little-endian `u16` table file.
fn read_u16_table(path: &Path) -> std::io::Result<Vec<u16>> {
    let mut file = File::open(path)?;
    let mut out = Vec::new();
    loop {
        match file.read_u16::<LittleEndian>() {
            Ok(v) => out.push(v),
            Err(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

fn main() -> std::io::Result<()> {
    simple_logger::init_with_level(log::Level::Info).expect("Cannot initialize logger");

    let matches = App::new("segvision-cli")
        .about("Segments a raw YUV 4:2:2 frame into color blobs")
        .arg(
            Arg::new("input-path")
                .help("Raw YUV 4:2:2 frame file to analyze")
                .short('i')
                .long("input")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("colors-path")
                .help("Color classification LUT file")
                .short('c')
                .long("colors")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("mask-path")
                .help("Active-pixel mask file (defaults to all-active)")
                .long("mask")
                .takes_value(true),
        )
        .arg(
            Arg::new("polar-r-path")
                .help("Polar distance table file (little-endian u16)")
                .long("polar-r")
                .takes_value(true),
        )
        .arg(
            Arg::new("polar-phi-path")
                .help("Polar angle table file (little-endian u16)")
                .long("polar-phi")
                .takes_value(true),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("color")
                .help("Color class index to report")
                .long("color")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("min-area")
                .help("Minimum blob area for the reported color")
                .long("min-area")
                .takes_value(true)
                .default_value("1"),
        )
        .get_matches();

    let params = CliParams {
        width: matches.value_of("width").unwrap().parse().expect("bad width"),
        height: matches
            .value_of("height")
            .unwrap()
            .parse()
            .expect("bad height"),
        fps: 30,
        color: matches.value_of("color").unwrap().parse().expect("bad color"),
        min_area: matches
            .value_of("min-area")
            .unwrap()
            .parse()
            .expect("bad min-area"),
    };

    let input_path = matches.value_of("input-path").map(Path::new).unwrap();
    let colors_path = matches.value_of("colors-path").map(Path::new).unwrap();

    let frame = read_file(input_path)?;
    let lut = read_file(colors_path)?;

    let mut pipeline = Pipeline::new(MemoryFrameSource::new());
    pipeline
        .open("memory", params.width, params.height, params.fps)
        .expect("cannot open pipeline at the requested resolution");
    pipeline.set_colors(&lut);
    pipeline
        .set_color_min_area(params.color, params.min_area)
        .expect("color index out of range");

    if let Some(mask_path) = matches.value_of("mask-path") {
        pipeline.set_active_pixels(&read_file(Path::new(mask_path))?);
    }
    if let (Some(r_path), Some(phi_path)) = (
        matches.value_of("polar-r-path"),
        matches.value_of("polar-phi-path"),
    ) {
        let r_table = read_u16_table(Path::new(r_path))?;
        let phi_table = read_u16_table(Path::new(phi_path))?;
        pipeline.set_locations(&r_table, &phi_table);
    }

    pipeline.start().expect("cannot start frame source");
    pipeline
        .source_mut()
        .push_frame(&frame)
        .expect("frame does not fit the configured resolution");

    pipeline.analyse().expect("analyse failed");

    if pipeline.run_capacity_exceeded() {
        log::warn!("run capacity exceeded for this frame");
    }
    if pipeline.region_capacity_exceeded() {
        log::warn!("region capacity exceeded for this frame");
    }

    let blobs = pipeline
        .get_blobs(params.color)
        .expect("color index out of range");
    println!(
        "{} blob(s) for color {}: (r, phi, area, cen_x, cen_y, x1, x2, y1, y2)",
        blobs.rows(),
        params.color
    );
    for i in 0..blobs.rows() {
        println!("{:?}", blobs.row(i));
    }

    Ok(())
}
