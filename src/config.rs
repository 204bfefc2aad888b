use std::num::NonZeroU64;
use std::time::Duration;

use crate::error::Error;

/// Parsed command line: `<program> <BYTES> <SECONDS>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub blocksize: NonZeroU64,
    pub runtime: Duration,
}

impl RunConfig {
    /// `args` includes the program name, as returned by `std::env::args`.
    pub fn from_args(args: &[String]) -> Result<RunConfig, Error> {
        if args.len() != 3 {
            return Err(Error::WrongArgumentCount { got: args.len() });
        }
        let program = args[0].clone();
        let (Some(bytes), Some(seconds)) = (parse_count(&args[1]), parse_count(&args[2])) else {
            return Err(Error::Usage { program });
        };
        // A zero-sized block has no last byte to touch.
        let blocksize = NonZeroU64::new(bytes).ok_or(Error::ZeroBlockSize { program })?;
        Ok(RunConfig {
            blocksize,
            runtime: Duration::from_secs(seconds),
        })
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}
