use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

/// One pointer position, optionally locked after it has been measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerStep {
    pub x: i32,
    pub y: i32,
    pub lock: bool,
}

impl FromStr for PointerStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let x = parts.next().unwrap_or_default();
        let y = parts.next().ok_or_else(|| format!("expected X,Y in {s:?}"))?;
        let lock = match parts.next() {
            None => false,
            Some("lock") => true,
            Some(other) => return Err(format!("unknown pointer flag {other:?}")),
        };
        if parts.next().is_some() {
            return Err(format!("too many fields in {s:?}"));
        }

        Ok(Self {
            x: x.parse().map_err(|e| format!("bad x in {s:?}: {e}"))?,
            y: y.parse().map_err(|e| format!("bad y in {s:?}: {e}"))?,
            lock,
        })
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Screenshot to measure (any format the image crate reads with the enabled features).
    pub screenshot: PathBuf,

    /// Pointer position as `X,Y`; append `,lock` to lock the measurement there.
    #[arg(long = "point", required = true, value_name = "X,Y[,lock]")]
    pub points: Vec<PointerStep>,

    /// Settings file; defaults to the per-user settings location.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Sample from one frozen frame without the cursor offset.
    #[arg(long)]
    pub frozen: bool,

    /// Frames to run at each pointer position.
    #[arg(long, default_value_t = 1)]
    pub frames_per_point: u32,

    /// Write the screenshot with the overlay composited on top.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Write only the overlay (transparent background) instead of compositing.
    #[arg(long, requires = "output")]
    pub overlay_only: bool,

    /// Print the measurements as JSON.
    #[arg(long)]
    pub json: bool,
}
