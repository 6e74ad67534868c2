//! Error taxonomy for the datagram engine.
//!
//! The five taxons below are the ones a caller can observe from the
//! public surface (`open`/`read_ping`/`write_ping`/`extract`/`insert`).
//! A few extra constructors exist purely so that internal code can be
//! precise about *why* a record was rejected; they fold back onto
//! `BadDatagram`/`Unintelligible` at the taxonomy boundary (see
//! `EmdgError::taxon`).
#[derive(Debug)]
pub enum EmdgError {
    /// Label validation failed (bad `start` byte, unknown id, unknown model)
    /// even after resync.
    BadDatagram { msg: String },
    /// Header parsed but the body was inconsistent (count out of range,
    /// more beams than `MAX_BEAMS`, etc). The record is dropped.
    Unintelligible { msg: String },
    /// Underlying stream I/O failed.
    Io(std::io::Error),
    /// Unrecognised datagram id; the framer has already skipped `len` bytes.
    Unsupported { id: u8 },
    /// `extract` was asked for a kind that does not match the last read
    /// record.
    CommentOrOther { msg: String },
    /// The checksum trailer did not sum correctly (kept distinct from
    /// `BadDatagram` for diagnostics; the framer never verifies this on
    /// input per spec, so this is only raised by test/verification code).
    Checksum { expected: u16, found: u16 },
    /// Stream ended before a complete record could be read.
    Truncated { wanted: usize, got: usize },
    /// A slice of the wrong length was handed to a fixed-width parser.
    TryFromSlice(std::array::TryFromSliceError),
    /// Non-ASCII bytes where an ASCII field was expected.
    TryFromUtf8(std::string::FromUtf8Error),
    #[cfg(feature = "to_json")]
    /// Serialisation/Deserialisation error.
    SerdeError(serde_json::Error),
}

/// The five taxons of the error-handling design. Every `EmdgError` maps
/// onto exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxon {
    BadDatagram,
    Unintelligible,
    Io,
    Unsupported,
    CommentOrOther,
}

impl EmdgError {
    /// Project this error onto its taxon, per §7 of the specification.
    pub fn taxon(&self) -> Taxon {
        use self::EmdgError::*;
        match self {
            BadDatagram { .. } | Checksum { .. } => Taxon::BadDatagram,
            Unintelligible { .. } | Truncated { .. } | TryFromSlice(_) | TryFromUtf8(_) => {
                Taxon::Unintelligible
            }
            Io(_) => Taxon::Io,
            Unsupported { .. } => Taxon::Unsupported,
            CommentOrOther { .. } => Taxon::CommentOrOther,
            #[cfg(feature = "to_json")]
            SerdeError(_) => Taxon::Unintelligible,
        }
    }

    /// `Io` must always be surfaced to the caller (see §7); everything else
    /// may be downgraded to a statistic if the caller prefers.
    pub fn must_surface(&self) -> bool {
        self.taxon() == Taxon::Io
    }

    /// `true` for a clean end-of-stream hit while framing a fresh record
    /// (as opposed to a stream that died mid-record, which is `Truncated`).
    pub fn is_eof(&self) -> bool {
        matches!(self, EmdgError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

impl From<std::array::TryFromSliceError> for EmdgError {
    fn from(e: std::array::TryFromSliceError) -> Self {
        Self::TryFromSlice(e)
    }
}

impl From<std::string::FromUtf8Error> for EmdgError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::TryFromUtf8(e)
    }
}

impl From<std::io::Error> for EmdgError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::fmt::Display for EmdgError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::EmdgError::*;
        match self {
            BadDatagram { msg } => write!(fmt, "bad datagram: {}", msg),
            Unintelligible { msg } => write!(fmt, "unintelligible record: {}", msg),
            Io(e) => write!(fmt, "{}", e),
            Unsupported { id } => write!(fmt, "unsupported datagram id 0x{:02X}", id),
            CommentOrOther { msg } => write!(fmt, "wrong kind for extract: {}", msg),
            Checksum { expected, found } => {
                write!(fmt, "checksum mismatch: expected {}, found {}", expected, found)
            }
            Truncated { wanted, got } => {
                write!(fmt, "stream ended early: wanted {} bytes, got {}", wanted, got)
            }
            TryFromSlice(e) => write!(fmt, "{}", e),
            TryFromUtf8(e) => write!(fmt, "{}", e),
            #[cfg(feature = "to_json")]
            SerdeError(e) => write!(fmt, "{}", e),
        }
    }
}

impl From<EmdgError> for String {
    fn from(e: EmdgError) -> String {
        e.to_string()
    }
}

impl std::error::Error for EmdgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::EmdgError::*;
        match self {
            Io(x) => x.source(),
            TryFromSlice(x) => x.source(),
            TryFromUtf8(x) => x.source(),
            #[cfg(feature = "to_json")]
            SerdeError(x) => x.source(),
            _ => None,
        }
    }
}
