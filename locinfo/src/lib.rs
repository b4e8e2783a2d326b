//! Raster point sampling via GDAL's `gdallocationinfo` utility.
//!
//! Opening the raster, reprojecting the query coordinate, and reading
//! the band value are all delegated to the external utility; this
//! crate builds the command line, runs it to completion, and parses
//! what comes back on stdout.
//!
//! # References
//!
//! 1. [gdallocationinfo](https://gdal.org/programs/gdallocationinfo.html)

mod error;

pub use crate::error::LocInfoError;
use geo::geometry::Coord;
use log::debug;
use std::{fmt, path::PathBuf, process::Command, str::FromStr};

/// Program invoked for every lookup.
const GDALLOCATIONINFO: &str = "gdallocationinfo";

/// A spatial reference identifier in `AUTHORITY:CODE` form,
/// e.g. `EPSG:3765`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Srs {
    authority: String,
    code: u32,
}

impl Srs {
    /// Numeric part of the identifier.
    pub fn code(&self) -> u32 {
        self.code
    }
}

impl FromStr for Srs {
    type Err = LocInfoError;

    fn from_str(s: &str) -> Result<Self, LocInfoError> {
        let (authority, code) = s
            .split_once(':')
            .ok_or_else(|| LocInfoError::Srs(s.to_string()))?;
        if authority.is_empty() {
            return Err(LocInfoError::Srs(s.to_string()));
        }
        let code = code
            .parse::<u32>()
            .map_err(|_| LocInfoError::Srs(s.to_string()))?;
        Ok(Self {
            authority: authority.to_string(),
            code,
        })
    }
}

impl fmt::Display for Srs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// One raster file plus the spatial reference of the coordinates it
/// will be queried with.
#[derive(Clone, Debug)]
pub struct Sampler {
    program: PathBuf,
    srs: Srs,
    raster: PathBuf,
}

impl Sampler {
    pub fn new(srs: Srs, raster: PathBuf) -> Self {
        Self {
            program: PathBuf::from(GDALLOCATIONINFO),
            srs,
            raster,
        }
    }

    /// Returns the raster value at `coord`.
    ///
    /// Blocks until the utility exits. A non-zero exit or stdout that
    /// doesn't parse as a number is an error; the latter is also what
    /// a coordinate outside the raster comes back as.
    pub fn sample(&self, coord: Coord<f64>) -> Result<f64, LocInfoError> {
        let args = self.args(coord);
        debug!("running {:?} with {args:?}", self.program);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| LocInfoError::Spawn(self.program.clone(), e))?;
        if !output.status.success() {
            return Err(LocInfoError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_value(&output.stdout)
    }

    /// Argument vector for one lookup. `-valonly` keeps everything
    /// but the value itself off stdout.
    fn args(&self, Coord { x, y }: Coord<f64>) -> [String; 6] {
        [
            "-valonly".to_string(),
            "-l_srs".to_string(),
            self.srs.to_string(),
            self.raster.display().to_string(),
            x.to_string(),
            y.to_string(),
        ]
    }

    #[cfg(test)]
    fn with_program(mut self, program: &str) -> Self {
        self.program = PathBuf::from(program);
        self
    }
}

fn parse_value(stdout: &[u8]) -> Result<f64, LocInfoError> {
    let text = std::str::from_utf8(stdout)
        .map_err(|_| LocInfoError::Value(String::from_utf8_lossy(stdout).into_owned()))?
        .trim();
    text.parse::<f64>()
        .map_err(|_| LocInfoError::Value(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_value, Coord, LocInfoError, Sampler, Srs};

    fn sampler() -> Sampler {
        Sampler::new("EPSG:4326".parse().unwrap(), "dem.tif".into())
    }

    #[test]
    fn test_srs_round_trip() {
        let srs: Srs = "EPSG:3765".parse().unwrap();
        assert_eq!(srs.code(), 3765);
        assert_eq!(srs.to_string(), "EPSG:3765");
    }

    #[test]
    fn test_srs_rejects_garbage() {
        assert!("EPSG".parse::<Srs>().is_err());
        assert!(":3765".parse::<Srs>().is_err());
        assert!("EPSG:".parse::<Srs>().is_err());
        assert!("EPSG:HTRS96".parse::<Srs>().is_err());
    }

    #[test]
    fn test_lookup_args() {
        let args = sampler().args(Coord { x: 16.25, y: 45.5 });
        assert_eq!(
            args,
            ["-valonly", "-l_srs", "EPSG:4326", "dem.tif", "16.25", "45.5"]
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(b"124\n").unwrap(), 124.0);
        assert_eq!(parse_value(b"123.6\n").unwrap(), 123.6);
        assert_eq!(parse_value(b"-1.5").unwrap(), -1.5);
        assert!(matches!(parse_value(b""), Err(LocInfoError::Value(_))));
        assert!(matches!(parse_value(b"\n"), Err(LocInfoError::Value(_))));
    }

    #[test]
    fn test_spawn_failure() {
        let err = sampler()
            .with_program("no-such-program-anywhere")
            .sample(Coord { x: 0.0, y: 0.0 })
            .unwrap_err();
        assert!(matches!(err, LocInfoError::Spawn(..)));
    }

    #[test]
    fn test_nonzero_exit() {
        let err = sampler()
            .with_program("false")
            .sample(Coord { x: 0.0, y: 0.0 })
            .unwrap_err();
        assert!(matches!(err, LocInfoError::Exit { .. }));
    }
}
