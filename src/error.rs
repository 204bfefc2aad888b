use std::{fmt, io};

use crate::size::ByteSize;

/// Fatal conditions. None of them is retried; `main` prints the message
/// after `Failed: ` and exits with a failure status.
#[derive(Debug)]
pub enum Error {
    WrongArgumentCount { got: usize },
    Usage { program: String },
    ZeroBlockSize { program: String },
    Allocation { size: ByteSize, source: io::Error },
}

impl Error {
    pub(crate) fn allocation(bytes: u64, source: io::Error) -> Error {
        Error::Allocation {
            size: ByteSize(bytes),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WrongArgumentCount { got } => write!(
                f,
                "wrong number of arguments (expected 3, got {})",
                got
            ),
            Error::Usage { program } => write!(f, "usage {} <BYTES> <SECONDS>", program),
            Error::ZeroBlockSize { program } => write!(
                f,
                "block size must be greater than zero (usage {} <BYTES> <SECONDS>)",
                program
            ),
            Error::Allocation { size, .. } => write!(f, "could not allocate {}", size),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Allocation { source, .. } => Some(source),
            _ => None,
        }
    }
}
