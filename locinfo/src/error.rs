use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocInfoError {
    #[error("could not run {0}")]
    Spawn(PathBuf, #[source] std::io::Error),

    #[error("{program} {status}: {stderr}")]
    Exit {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("unparsable sample value {0:?}")]
    Value(String),

    #[error("invalid spatial reference {0:?}, expected AUTHORITY:CODE")]
    Srs(String),
}
