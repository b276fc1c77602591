use thiserror::Error;

/// cmdtree unified error type
#[derive(Error, Debug)]
pub enum CmdTreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Configuration error: {message}")]
    Config { message: String },
    
    #[error("{0}")]
    Flags(#[from] clap::Error),
    
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    
    #[error("Output error: {0}")]
    Output(String),
    
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CmdTreeError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Flags(e) => e.exit_code(),
            Self::UnknownCommand(_) => 2,
            _ => 1,
        }
    }
}

pub type CmdTreeResult<T> = Result<T, CmdTreeError>;
