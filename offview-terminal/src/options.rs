/// Command-line options for the viewer
use clap::Parser;
use offview_core::{Axis, DrawStrategy};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_ROTATION_AXIS: Axis = Axis::Y;
pub const DEFAULT_TOTAL_FRAMES: u32 = 360;
pub const DEFAULT_ROTATION_RATE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "offview")]
#[command(version, about = "Spin or trackball-rotate a NOFF mesh in the terminal")]
pub struct Cli {
    /// Path to a NOFF mesh
    pub filename: PathBuf,

    /// Cull back faces
    #[arg(short = 'b', long)]
    pub back_cull: bool,

    /// Interactive trackball mode; disables clocked mode
    #[arg(short = 't', long)]
    pub trackball: bool,

    /// Merge faces of the same kind and color before drawing
    #[arg(short = 'm', long)]
    pub merge_faces: bool,

    /// Automatic rotation axis: x, y or z
    #[arg(short = 'r', long, value_name = "AXIS")]
    pub rotation_axis: Option<String>,

    /// Draw strategy: n (immediate), d (precompiled) or v (batched)
    #[arg(short = 'o', long, value_name = "MODE", default_value = "n", value_parser = parse_strategy)]
    pub strategy: DrawStrategy,

    /// Viewport width and height
    #[arg(short = 'w', long, value_name = "N", default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Frames to draw in automatic mode
    #[arg(short = 'f', long, value_name = "N", default_value_t = DEFAULT_TOTAL_FRAMES)]
    pub frames: u32,

    /// Degrees advanced per frame in automatic mode
    #[arg(
        short = 'a',
        long,
        value_name = "N",
        default_value_t = DEFAULT_ROTATION_RATE,
        allow_negative_numbers = true
    )]
    pub angle: i32,

    /// Run for N seconds, report the frame rate and exit
    #[arg(short = 'c', long, value_name = "N", overrides_with = "dump")]
    pub clock: Option<u32>,

    /// Report the frame rate every N seconds
    #[arg(short = 'd', long, value_name = "N", overrides_with = "clock")]
    pub dump: Option<u32>,
}

fn parse_strategy(value: &str) -> Result<DrawStrategy, String> {
    match value {
        "n" => Ok(DrawStrategy::Immediate),
        "d" => Ok(DrawStrategy::Precompiled),
        "v" => Ok(DrawStrategy::Batched),
        other => Err(format!("expected n, d or v, got {other:?}")),
    }
}

/// Periodic frame-rate reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Off,
    /// Run for this many seconds, report the frame rate and exit
    Clock(u32),
    /// Report the frame rate every this many seconds
    Dump(u32),
}

/// Viewer settings after the command line has been reconciled
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub filename: PathBuf,
    pub back_cull: bool,
    pub trackball: bool,
    pub merge_faces: bool,
    pub rotation_axis: Axis,
    pub rotation_rate: f32,
    pub total_frames: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub strategy: DrawStrategy,
    pub timing: Timing,
    /// Problems that were reported but did not stop parsing
    pub warnings: Vec<String>,
}

impl Options {
    /// Parse a full argument list, program name first.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Options::from)
    }
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        let mut warnings = Vec::new();

        let rotation_axis = match cli.rotation_axis.as_deref() {
            None => DEFAULT_ROTATION_AXIS,
            Some(value) => match value.chars().next().and_then(Axis::from_char) {
                Some(axis) => axis,
                None => {
                    warnings.push(format!("invalid option for rotation axis: {value}"));
                    DEFAULT_ROTATION_AXIS
                }
            },
        };

        // Trackball mode has no fixed run length
        let timing = match (cli.clock, cli.dump) {
            (_, Some(seconds)) => Timing::Dump(seconds),
            (Some(seconds), None) if !cli.trackball => Timing::Clock(seconds),
            _ => Timing::Off,
        };

        Options {
            filename: cli.filename,
            back_cull: cli.back_cull,
            trackball: cli.trackball,
            merge_faces: cli.merge_faces,
            rotation_axis,
            rotation_rate: cli.angle as f32,
            total_frames: cli.frames,
            window_width: cli.width,
            window_height: cli.width,
            strategy: cli.strategy,
            timing,
            warnings,
        }
    }
}
