use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported puzzle size {0}, expected one of 3, 4, 5, 6")]
    InvalidSize(usize),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("board is not reachable from the solved state")]
    Unsolvable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
