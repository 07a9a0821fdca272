//! Text format for sampled lattices.
//!
//! ```text
//! lattice 2 1 1
//! bounds -1 1 0 1 0 1
//! 1 0 0
//! 0 0 0
//! 1 1 0
//! 0 0 0
//! ```
//!
//! The header gives the cell count per axis, `bounds` the world extents as
//! `x0 x1 y0 y1 z0 z1`, followed by one `0`/`1` flag per lattice point with
//! x varying fastest. Whitespace between flags is optional.

use std::fmt::Write as _;

use nom::{
    bytes::complete::tag,
    character::complete::{digit1, multispace0, multispace1, one_of},
    combinator::{map, map_res},
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::error::{RenderError, RenderResult};
use crate::field::{SampledLattice, ScalarField};
use crate::geometry::{CellRange, Extents};

/// Parse a lattice from its text form
pub fn parse_lattice(input: &str) -> RenderResult<SampledLattice> {
    match parse_lattice_impl(input) {
        Ok(("", (range, extents, samples))) => SampledLattice::new(extents, range, samples),
        Ok((rest, _)) => {
            let snippet: String = rest.chars().take(16).collect();
            Err(RenderError::Parse(format!("unexpected input near {snippet:?}")))
        }
        Err(e) => Err(RenderError::Parse(format!("{:?}", e))),
    }
}

fn parse_lattice_impl(input: &str) -> IResult<&str, (CellRange, Extents, Vec<bool>)> {
    let (input, range) = parse_header(input)?;
    let (input, extents) = parse_bounds(input)?;
    let (input, samples) = many0(parse_flag)(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, (range, extents, samples)))
}

fn parse_header(input: &str) -> IResult<&str, CellRange> {
    let (input, _) = preceded(multispace0, tag("lattice"))(input)?;
    let (input, nx) = parse_count(input)?;
    let (input, ny) = parse_count(input)?;
    let (input, nz) = parse_count(input)?;
    Ok((input, CellRange::new(nx, ny, nz)))
}

fn parse_count(input: &str) -> IResult<&str, usize> {
    map_res(preceded(multispace1, digit1), str::parse::<usize>)(input)
}

fn parse_bounds(input: &str) -> IResult<&str, Extents> {
    let (input, _) = preceded(multispace0, tag("bounds"))(input)?;
    let (input, x0) = preceded(multispace1, double)(input)?;
    let (input, x1) = preceded(multispace1, double)(input)?;
    let (input, y0) = preceded(multispace1, double)(input)?;
    let (input, y1) = preceded(multispace1, double)(input)?;
    let (input, z0) = preceded(multispace1, double)(input)?;
    let (input, z1) = preceded(multispace1, double)(input)?;
    Ok((input, Extents::new((x0, x1), (y0, y1), (z0, z1))))
}

fn parse_flag(input: &str) -> IResult<&str, bool> {
    map(preceded(multispace0, one_of("01")), |c| c == '1')(input)
}

/// Write a lattice in the form read by [`parse_lattice`], one x row per line
pub fn format_lattice(lattice: &SampledLattice) -> String {
    let range = lattice.resolution();
    let e = lattice.extents();
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "lattice {} {} {}", range.nx, range.ny, range.nz);
    let _ = writeln!(
        out,
        "bounds {} {} {} {} {} {}",
        e.min.x, e.max.x, e.min.y, e.max.y, e.min.z, e.max.z
    );
    for k in 0..=range.nz {
        for j in 0..=range.ny {
            let row: Vec<&str> = (0..=range.nx)
                .map(|i| if lattice.sample(i, j, k) { "1" } else { "0" })
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CellIndex;
    use approx::assert_relative_eq;

    const SMALL: &str = "lattice 1 1 1\nbounds 0 2 0 2 -0.5 1.5\n1 0\n0 0\n0 0\n0 0\n";

    #[test]
    fn test_parse_small_lattice() {
        let lattice = parse_lattice(SMALL).unwrap();
        assert_eq!(lattice.resolution(), CellRange::new(1, 1, 1));
        assert_relative_eq!(lattice.extents().min.z, -0.5);
        assert_relative_eq!(lattice.extents().max.x, 2.0);
        assert_eq!(lattice.inner_count(), 1);
        assert_eq!(lattice.corner_flags(CellIndex::new(0, 0, 0)).bits(), 1);
    }

    #[test]
    fn test_packed_flags() {
        let lattice = parse_lattice("lattice 1 1 1 bounds 0 1 0 1 0 1 11110000").unwrap();
        assert_eq!(lattice.corner_flags(CellIndex::new(0, 0, 0)).bits(), 0b0000_1111);
    }

    #[test]
    fn test_wrong_flag_count() {
        let result = parse_lattice("lattice 1 1 1\nbounds 0 1 0 1 0 1\n1 0 1\n");
        assert_eq!(
            result,
            Err(RenderError::SampleCountMismatch {
                expected: 8,
                actual: 3
            })
        );
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(parse_lattice("solid cube"), Err(RenderError::Parse(_))));
        assert!(matches!(
            parse_lattice("lattice 1 1 1\nbounds 0 1 0 1 0 1\n1 0 2"),
            Err(RenderError::Parse(_))
        ));
    }

    #[test]
    fn test_oversized_header_is_an_error() {
        let header = "lattice 4294967295 4294967295 4294967295\n";
        let result = parse_lattice(&format!("{header}bounds 0 1 0 1 0 1\n0 1"));
        assert!(matches!(result, Err(RenderError::LatticeTooLarge { .. })));
        let result = parse_lattice("lattice 99999999999999999999999 1 1\nbounds 0 1 0 1 0 1\n0 1");
        assert!(matches!(result, Err(RenderError::Parse(_))));
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let result = parse_lattice("lattice 1 1 1\nbounds 0 1 3 3 0 1\n00000000");
        assert!(matches!(result, Err(RenderError::DegenerateExtent { .. })));
    }

    #[test]
    fn test_format_is_readable() {
        let lattice = parse_lattice(SMALL).unwrap();
        let text = format_lattice(&lattice);
        assert!(text.starts_with("lattice 1 1 1\nbounds 0 2 0 2 -0.5 1.5\n"));
        assert_eq!(parse_lattice(&text).unwrap(), lattice);
    }
}
