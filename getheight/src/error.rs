use gdal::errors::GdalError;
use locinfo::LocInfoError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("could not open input {0}")]
    InputOpen(PathBuf, #[source] GdalError),

    #[error("input {0} has no features")]
    EmptySource(PathBuf),

    #[error("could not create output {0}")]
    OutputCreate(PathBuf, #[source] GdalError),

    #[error("input already has a field named {0:?}")]
    FieldCollision(String),

    #[error("feature {0} has no point geometry")]
    MissingGeometry(u64),

    #[error("could not write feature {0}")]
    FeatureWrite(u64, #[source] GdalError),

    #[error(transparent)]
    Sample(#[from] LocInfoError),

    #[error("could not write projection file {0}")]
    ProjectionWrite(PathBuf, #[source] std::io::Error),

    #[error("{0}")]
    Gdal(#[from] GdalError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Process exit code for this failure. Usage errors never get
    /// here; clap exits with 2 on its own.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Sample(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RunError;
    use locinfo::LocInfoError;

    #[test]
    fn test_sampling_failures_have_their_own_exit_code() {
        let sample = RunError::Sample(LocInfoError::Value("nan".to_string()));
        assert_eq!(sample.exit_code(), 3);
        let other = RunError::EmptySource("points.shp".into());
        assert_eq!(other.exit_code(), 1);
    }
}
