use thiserror::Error;

/// Structural decode failures. These abort the whole decode; no partial point
/// set is ever returned alongside one. Malformed individual payload lines are
/// deliberately not represented here -- the ascii decoders skip them.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The PCD header ended without a `DATA` directive.
    #[error("invalid PCD: header has no DATA directive")]
    MissingEncodingDirective,

    /// The `DATA` directive named an encoding we cannot decode
    /// (`binary_compressed`, or anything unrecognized).
    #[error("unsupported PCD payload encoding `{0}`")]
    UnsupportedEncoding(String),

    /// The declared fields sum to a zero byte stride, so binary records have
    /// no width to step by.
    #[error("invalid PCD: field declaration yields a zero byte stride")]
    InvalidStride,

    /// A binary position read would run past the end of the buffer.
    #[error("truncated PCD payload: need {needed} bytes, have {have}")]
    TruncatedPayload { needed: usize, have: usize },

    /// A required numeric header token (`POINTS`, `SIZE`, `COUNT`) failed to
    /// parse as an integer.
    #[error("bad numeric token `{token}` in {directive} directive")]
    NumericParseFailure {
        directive: &'static str,
        token: String,
    },

    /// The binary fast path requires the first three declared fields to be
    /// plain 4-byte float x, y, z; this header declares something else.
    #[error("unsupported PCD field layout: {0}")]
    BadFieldLayout(String),
}
