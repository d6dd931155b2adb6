//! Plain-text XYZ decoding: one point per non-blank line, first three numeric
//! tokens are the coordinates, extra tokens ignored.

use crate::bounds::{Aabb, ParseMeta, Point3};
use crate::error::DecodeError;

/// Parse one payload line into a point. Returns `None` for lines with fewer
/// than three tokens or with a non-numeric token among the first three; such
/// lines are skipped by the callers, never treated as errors.
pub(crate) fn parse_point_line(line: &str) -> Option<Point3> {
    let mut tokens = line.split_whitespace();
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    let z = tokens.next()?.parse().ok()?;
    Some([x, y, z])
}

pub(crate) fn decode(bytes: &[u8]) -> Result<(Vec<Point3>, ParseMeta), DecodeError> {
    let text = String::from_utf8_lossy(bytes);
    let mut points = Vec::new();
    let mut bounds = Aabb::empty();

    for line in text.lines() {
        if let Some(p) = parse_point_line(line) {
            bounds.update(p);
            points.push(p);
        }
    }

    log::debug!("XYZ: accepted {} points", points.len());

    let meta = ParseMeta {
        num_points: points.len(),
        bounds,
    };
    Ok((points, meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_with_exact_bounds() {
        // Concrete scenario from the original parser's contract.
        let (points, meta) = decode(b"1 2 3\n4 5 6\n").unwrap();
        assert_eq!(points, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(meta.num_points, 2);
        assert_eq!(meta.bounds.min, [1.0, 2.0, 3.0]);
        assert_eq!(meta.bounds.max, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let input = b"1 2 3\n\n   \nonly two\nnot a number here\n7 8 9 extra tokens ok\n4 5\n";
        let (points, meta) = decode(input).unwrap();
        assert_eq!(points, vec![[1.0, 2.0, 3.0], [7.0, 8.0, 9.0]]);
        assert_eq!(meta.num_points, 2);
    }

    #[test]
    fn bad_numeric_token_in_first_three_skips_line() {
        let (points, _) = decode(b"1 oops 3\n1 2 3\n").unwrap();
        assert_eq!(points, vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn negative_and_scientific_notation() {
        let (points, meta) = decode(b"-1.5 2e3 0.25\n").unwrap();
        assert_eq!(points, vec![[-1.5, 2000.0, 0.25]]);
        assert_eq!(meta.bounds.min, meta.bounds.max);
    }

    #[test]
    fn empty_input_yields_empty_sentinel_box() {
        let (points, meta) = decode(b"").unwrap();
        assert!(points.is_empty());
        assert_eq!(meta.num_points, 0);
        assert!(meta.bounds.is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let (points, _) = decode(b"1 2 3\r\n4 5 6\r\n").unwrap();
        assert_eq!(points.len(), 2);
    }
}
