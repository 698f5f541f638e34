use thiserror::Error;

#[derive(Error, Debug)]
pub enum PakarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
