//! PCD header and payload decoding.
//!
//! Header grammar (line oriented, keywords case-insensitive, `#` starts a
//! comment line, unknown directives are ignored for forward compatibility):
//!
//! ```text
//! FIELDS <names...>
//! SIZE   <bytes per field...>
//! TYPE   <type tags...>
//! COUNT  <repeats per field...>     (defaults to 1 per field when absent)
//! POINTS <total point count>
//! DATA   <ascii|binary|binary_compressed>   (terminator; payload follows)
//! ```
//!
//! Binary payloads are decoded with a fixed-offset fast path: positions are
//! read as three little-endian f32 at offsets 0/4/8 of each record, stepping
//! by the header-derived stride. That is only sound when the record actually
//! leads with plain 4-byte float x, y, z fields, so headers declaring any
//! other leading layout are rejected instead of misread.

use crate::bounds::{Aabb, ParseMeta, Point3};
use crate::error::DecodeError;
use crate::xyz::parse_point_line;

/// Everything gleaned from the header scan. Built once, consumed to pick the
/// payload decoder and compute the byte stride, then dropped.
struct HeaderDescriptor {
    fields: Vec<String>,
    sizes: Vec<u32>,
    types: Vec<String>,
    counts: Vec<u32>,
    declared_points: usize,
    encoding: String,
    /// Byte offset of the first payload byte (right after the DATA line's
    /// terminator). Exact, not an approximation over trimmed lines.
    payload_start: usize,
}

impl HeaderDescriptor {
    /// Total byte width of one binary record.
    fn stride(&self) -> usize {
        self.sizes
            .iter()
            .zip(self.counts.iter())
            .map(|(&size, &count)| size as usize * count as usize)
            .sum()
    }
}

pub(crate) fn decode(bytes: &[u8]) -> Result<(Vec<Point3>, ParseMeta), DecodeError> {
    let header = parse_header(bytes)?;

    let (points, bounds) = match header.encoding.as_str() {
        "ascii" => decode_ascii(&bytes[header.payload_start..]),
        "binary" => decode_binary(bytes, &header)?,
        other => return Err(DecodeError::UnsupportedEncoding(other.to_owned())),
    };

    log::debug!(
        "PCD: accepted {} points ({} payload, {} declared)",
        points.len(),
        header.encoding,
        header.declared_points
    );

    let meta = ParseMeta {
        num_points: points.len(),
        bounds,
    };
    Ok((points, meta))
}

fn parse_numeric_list<'a>(
    tokens: impl Iterator<Item = &'a str>,
    directive: &'static str,
) -> Result<Vec<u32>, DecodeError> {
    tokens
        .map(|t| {
            t.parse().map_err(|_| DecodeError::NumericParseFailure {
                directive,
                token: t.to_owned(),
            })
        })
        .collect()
}

fn parse_header(bytes: &[u8]) -> Result<HeaderDescriptor, DecodeError> {
    let mut fields = Vec::new();
    let mut sizes = Vec::new();
    let mut types = Vec::new();
    let mut counts: Option<Vec<u32>> = None;
    let mut declared_points = 0usize;
    let mut encoding: Option<String> = None;

    // Walk lines by hand so we know the exact byte offset after each one.
    let mut offset = 0usize;
    let mut rest = bytes;
    while !rest.is_empty() {
        let (line_bytes, advance) = match rest.iter().position(|&b| b == b'\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        rest = &rest[advance..];
        offset += advance;

        // Header lines must be text; anything undecodable is treated like an
        // unknown directive and skipped.
        let line = match std::str::from_utf8(line_bytes) {
            Ok(s) => s.trim(),
            Err(_) => continue,
        };
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let key = match tokens.next() {
            Some(k) => k.to_ascii_uppercase(),
            None => continue,
        };
        match key.as_str() {
            "FIELDS" => fields = tokens.map(str::to_owned).collect(),
            "SIZE" => sizes = parse_numeric_list(tokens, "SIZE")?,
            "TYPE" => types = tokens.map(str::to_owned).collect(),
            "COUNT" => counts = Some(parse_numeric_list(tokens, "COUNT")?),
            "POINTS" => {
                let token = tokens.next().unwrap_or("");
                declared_points = token.parse().map_err(|_| DecodeError::NumericParseFailure {
                    directive: "POINTS",
                    token: token.to_owned(),
                })?;
            }
            "DATA" => {
                encoding = Some(tokens.next().unwrap_or("").to_ascii_lowercase());
                // Terminator: the payload begins at the current offset.
                break;
            }
            // Unknown directives (VERSION, WIDTH, HEIGHT, VIEWPOINT, ...) are
            // ignored so newer headers still decode.
            _ => {}
        }
    }

    let encoding = encoding.ok_or(DecodeError::MissingEncodingDirective)?;
    let counts = counts.unwrap_or_else(|| vec![1; sizes.len()]);

    Ok(HeaderDescriptor {
        fields,
        sizes,
        types,
        counts,
        declared_points,
        encoding,
        payload_start: offset,
    })
}

/// Ascii payload: one point per line, handled exactly like plain XYZ text
/// (short or non-numeric lines skipped, bounds accumulated per point).
fn decode_ascii(payload: &[u8]) -> (Vec<Point3>, Aabb) {
    let text = String::from_utf8_lossy(payload);
    let mut points = Vec::new();
    let mut bounds = Aabb::empty();
    for line in text.lines() {
        if let Some(p) = parse_point_line(line) {
            bounds.update(p);
            points.push(p);
        }
    }
    (points, bounds)
}

/// Reject headers the fixed 0/4/8 position read would misinterpret: the first
/// three declared fields must be x, y, z, 4 bytes wide, count 1, and float
/// typed when a TYPE tag is present.
fn validate_position_layout(h: &HeaderDescriptor) -> Result<(), DecodeError> {
    if h.fields.len() < 3 {
        return Err(DecodeError::BadFieldLayout(format!(
            "need at least 3 fields, header declares {}",
            h.fields.len()
        )));
    }
    if h.sizes.len() != h.fields.len() {
        return Err(DecodeError::BadFieldLayout(format!(
            "SIZE lists {} entries for {} fields",
            h.sizes.len(),
            h.fields.len()
        )));
    }
    if h.counts.len() != h.fields.len() {
        return Err(DecodeError::BadFieldLayout(format!(
            "COUNT lists {} entries for {} fields",
            h.counts.len(),
            h.fields.len()
        )));
    }
    for (i, want) in ["x", "y", "z"].iter().enumerate() {
        if !h.fields[i].eq_ignore_ascii_case(want) {
            return Err(DecodeError::BadFieldLayout(format!(
                "leading fields must be x y z, found `{}` at index {}",
                h.fields[i], i
            )));
        }
        if h.sizes[i] != 4 {
            return Err(DecodeError::BadFieldLayout(format!(
                "field `{}` is {} bytes, expected 4",
                h.fields[i], h.sizes[i]
            )));
        }
        if h.counts[i] != 1 {
            return Err(DecodeError::BadFieldLayout(format!(
                "field `{}` has count {}, expected 1",
                h.fields[i], h.counts[i]
            )));
        }
        if let Some(tag) = h.types.get(i) {
            if !tag.eq_ignore_ascii_case("f") {
                return Err(DecodeError::BadFieldLayout(format!(
                    "field `{}` has type `{}`, expected F",
                    h.fields[i], tag
                )));
            }
        }
    }
    Ok(())
}

fn decode_binary(bytes: &[u8], h: &HeaderDescriptor) -> Result<(Vec<Point3>, Aabb), DecodeError> {
    let stride = h.stride();
    if stride == 0 {
        return Err(DecodeError::InvalidStride);
    }
    validate_position_layout(h)?;

    // Bounds-check the whole run up front; only the 12 position bytes of the
    // last record need to be present.
    if h.declared_points > 0 {
        let needed = (h.declared_points - 1)
            .checked_mul(stride)
            .and_then(|v| v.checked_add(h.payload_start + 12))
            .ok_or(DecodeError::TruncatedPayload {
                needed: usize::MAX,
                have: bytes.len(),
            })?;
        if needed > bytes.len() {
            return Err(DecodeError::TruncatedPayload {
                needed,
                have: bytes.len(),
            });
        }
    }

    let mut points = Vec::with_capacity(h.declared_points);
    let mut bounds = Aabb::empty();
    for i in 0..h.declared_points {
        let base = h.payload_start + i * stride;
        let rec = &bytes[base..base + 12];
        let p: Point3 = [
            f32::from_le_bytes(rec[0..4].try_into().unwrap()),
            f32::from_le_bytes(rec[4..8].try_into().unwrap()),
            f32::from_le_bytes(rec[8..12].try_into().unwrap()),
        ];
        bounds.update(p);
        points.push(p);
    }
    Ok((points, bounds))
}
