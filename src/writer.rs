//! Reduced motion output
//!
//! Writes the paths of a [`ParseResult`] back as plain absolute G-code:
//! layer markers, one `G0` per path start and a `G1` per further point.
//! Rotations, telemetry and the `A`/`B` companions are not written.

use std::fmt::Write;

use crate::model::{ParseResult, Point};

/// Render the reduced motion sequence of `result`
pub fn to_gcode(result: &ParseResult) -> String {
    let mut out = String::from("G90\n");

    for layer in result.layers() {
        // Writing into a String cannot fail
        let _ = writeln!(out, ";LAYER:{}", layer.number());
        for path in layer.paths() {
            let mut points = path.points().iter();
            if let Some(first) = points.next() {
                write_move(&mut out, "G0", first);
            }
            for point in points {
                write_move(&mut out, "G1", point);
            }
        }
    }

    out
}

fn write_move(out: &mut String, command: &str, point: &Point) {
    // `{}` on f64 prints the shortest text that parses back to the same value
    let _ = writeln!(out, "{} X{} Y{} Z{}", command, point.x, point.y, point.z);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::reader::parse_str;

    #[test]
    fn test_output_shape() {
        let result = parse_str(";LAYER:3\nG1 X1.5 Y-2 Z0.2\n", &ParserConfig::default(), None).unwrap();
        assert_eq!(
            to_gcode(&result),
            "G90\n;LAYER:3\nG0 X0 Y0 Z0\nG1 X1.5 Y-2 Z0.2\n"
        );
    }

    #[test]
    fn test_empty_result() {
        let result = parse_str("", &ParserConfig::default(), None).unwrap();
        assert_eq!(to_gcode(&result), "G90\n");
    }
}
