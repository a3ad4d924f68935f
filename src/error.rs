use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A read would run past the declared end of the metadata block. Raised
    /// by the bounds-checked reader before any memory is touched;
    /// attacker-controlled offsets always end up here.
    #[error("read of {len} bytes at {offset:#x} exceeds block length {size:#x}")]
    OutOfRange {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Entry count or byte-order mark of the private directory is outside
    /// the accepted set. The tag stream yields zero records instead of
    /// failing the whole decode.
    #[error("malformed private directory; {0}")]
    MalformedDirectory(String),

    /// No offset-table entry matched and the structural validator rejected
    /// every candidate location. Calibration is simply omitted.
    #[error("calibration section could not be located")]
    UnresolvedCalibration,

    /// The container handed over fewer bytes than the block header declared.
    /// Decoding continues over whatever was read.
    #[error("truncated read; {0}")]
    Truncated(io::Error),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Truncated(value)
    }
}
