//! cloudfmt: decoders for simple point-cloud interchange files.
//!
//! Two formats are understood:
//! - PCD: a self-describing text header (`FIELDS`/`SIZE`/`TYPE`/`COUNT`/
//!   `POINTS`, terminated by `DATA`) followed by an ascii or binary payload.
//!   Only xyz positions are decoded; binary payloads must lead with three
//!   4-byte float position fields.
//! - XYZ: one point per line, at least three whitespace-separated numeric
//!   tokens, extra tokens ignored.
//!
//! Decoding is all-or-nothing per file. Structural problems (missing `DATA`
//! directive, zero stride, truncated binary payload) surface as
//! [`DecodeError`]; individual malformed payload lines are skipped so slightly
//! damaged real-world files still load.

use std::path::Path;

use anyhow::Context;

mod bounds;
mod error;
mod pcd;
mod xyz;

pub use bounds::{Aabb, ParseMeta, Point3};
pub use error::DecodeError;

/// Caller-facing format selector, normally derived from the file extension.
/// For PCD the header's `DATA` directive picks ascii vs. binary internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pcd,
    Xyz,
}

impl Format {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "pcd" => Some(Format::Pcd),
            "xyz" | "txt" => Some(Format::Xyz),
            _ => None,
        }
    }
}

/// Decode a complete file image into points plus derived metadata.
///
/// The returned metadata is computed from the accepted points; a PCD header's
/// `POINTS` claim is only used to size binary reads, never echoed back.
pub fn decode(bytes: &[u8], format: Format) -> Result<(Vec<Point3>, ParseMeta), DecodeError> {
    match format {
        Format::Pcd => pcd::decode(bytes),
        Format::Xyz => xyz::decode(bytes),
    }
}

/// Convenience wrapper: read a file and decode it based on its extension.
pub fn read_file<P: AsRef<Path>>(path: P) -> anyhow::Result<(Vec<Point3>, ParseMeta)> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let format = Format::from_extension(ext)
        .with_context(|| format!("unrecognized point cloud extension: {}", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let decoded = decode(&bytes, format)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping() {
        assert_eq!(Format::from_extension("pcd"), Some(Format::Pcd));
        assert_eq!(Format::from_extension("PCD"), Some(Format::Pcd));
        assert_eq!(Format::from_extension("xyz"), Some(Format::Xyz));
        assert_eq!(Format::from_extension("txt"), Some(Format::Xyz));
        assert_eq!(Format::from_extension("laz"), None);
        assert_eq!(Format::from_extension(""), None);
    }

    #[test]
    fn dispatch_by_format() {
        let (points, meta) = decode(b"1 2 3\n", Format::Xyz).unwrap();
        assert_eq!(points, vec![[1.0, 2.0, 3.0]]);
        assert_eq!(meta.num_points, 1);

        // The same bytes as PCD are a header with no DATA directive.
        let err = decode(b"1 2 3\n", Format::Pcd).unwrap_err();
        assert!(matches!(err, DecodeError::MissingEncodingDirective));
    }
}
