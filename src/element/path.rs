//! Freehand path descriptors.
//!
//! Paths are stored as SVG-style path data in the element's local frame
//! (origin at the element's top-left corner). Supported commands are
//! `M L H V Q C Z` in absolute and relative form. The commands are replayed
//! into a lyon path and flattened, so every backend only has to draw
//! polylines.

use egui::{Pos2, Vec2};
use lyon::math::{point, Point};
use lyon::path::iterator::PathIterator;
use lyon::path::{Event, Path};

use super::common::distance_to_line_segment;
use crate::error::PathError;

/// Maximum distance between a curve and its flattened polyline, in slide units
pub const FLATTEN_TOLERANCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f32),
}

fn tokenize(data: &str) -> Result<Vec<Token>, PathError> {
    let chars: Vec<char> = data.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || c == ',' {
            i += 1;
        } else if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') {
            let start = i;
            let mut seen_dot = false;
            let mut seen_exp = false;
            if matches!(c, '-' | '+') {
                i += 1;
            }
            while i < chars.len() {
                let ch = chars[i];
                if ch.is_ascii_digit() {
                    i += 1;
                } else if ch == '.' && !seen_dot && !seen_exp {
                    seen_dot = true;
                    i += 1;
                } else if matches!(ch, 'e' | 'E') && !seen_exp {
                    seen_exp = true;
                    i += 1;
                    if i < chars.len() && matches!(chars[i], '-' | '+') {
                        i += 1;
                    }
                } else {
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f32>()
                .map_err(|_| PathError::InvalidNumber(text.clone()))?;
            tokens.push(Token::Number(value));
        } else if "MmLlHhVvQqCcZz".contains(c) {
            tokens.push(Token::Command(c));
            i += 1;
        } else {
            return Err(PathError::UnexpectedCommand(c));
        }
    }

    Ok(tokens)
}

fn take_numbers<const N: usize>(
    tokens: &[Token],
    index: &mut usize,
    command: char,
) -> Result<[f32; N], PathError> {
    let mut out = [0.0; N];
    for slot in &mut out {
        match tokens.get(*index) {
            Some(Token::Number(v)) => {
                *slot = *v;
                *index += 1;
            }
            _ => {
                return Err(PathError::MissingNumber {
                    command,
                    expected: N,
                })
            }
        }
    }
    Ok(out)
}

fn at(p: Pos2) -> Point {
    point(p.x, p.y)
}

fn to_pos(p: Point) -> Pos2 {
    Pos2::new(p.x, p.y)
}

fn finish_subpath(subpaths: &mut Vec<Vec<Pos2>>, current: Vec<Pos2>) {
    // A lone move-to, or a close right after one, draws nothing
    let Some(first) = current.first() else {
        return;
    };
    if current.iter().any(|p| p != first) {
        subpaths.push(current);
    }
}

/// Flattens every subpath of `path` into a polyline. Closed subpaths end on
/// their first point.
fn flatten(path: &Path) -> Vec<Vec<Pos2>> {
    let mut subpaths = Vec::new();
    let mut current = Vec::new();
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            Event::Begin { at } => current = vec![to_pos(at)],
            Event::Line { to, .. } => current.push(to_pos(to)),
            Event::End { first, close, .. } => {
                let first = to_pos(first);
                if close && current.last() != Some(&first) {
                    current.push(first);
                }
                finish_subpath(&mut subpaths, std::mem::take(&mut current));
            }
            Event::Quadratic { .. } | Event::Cubic { .. } => {}
        }
    }
    subpaths
}

/// Parses path data into flattened polylines, one per subpath.
pub fn parse_path(data: &str) -> Result<Vec<Vec<Pos2>>, PathError> {
    let tokens = tokenize(data)?;
    let mut builder = Path::builder();
    let mut open = false;
    let mut pen = Pos2::ZERO;
    let mut start = Pos2::ZERO;
    let mut last: Option<char> = None;
    let mut i = 0;

    while i < tokens.len() {
        let command = match tokens[i] {
            Token::Command(c) => {
                i += 1;
                c
            }
            // Repeated coordinates reuse the previous command; after a move
            // they continue as line-to.
            Token::Number(_) => match last {
                None => return Err(PathError::MissingMoveTo),
                Some('M') => 'L',
                Some('m') => 'l',
                Some(c @ ('Z' | 'z')) => return Err(PathError::UnexpectedCommand(c)),
                Some(c) => c,
            },
        };
        if last.is_none() && !matches!(command, 'M' | 'm') {
            return Err(PathError::MissingMoveTo);
        }
        let relative = command.is_ascii_lowercase();
        let base = if relative { pen.to_vec2() } else { Vec2::ZERO };
        let upper = command.to_ascii_uppercase();

        // Drawing after a close starts a new subpath at the pen
        if !open && matches!(upper, 'L' | 'H' | 'V' | 'Q' | 'C') {
            builder.begin(at(pen));
            open = true;
        }

        match upper {
            'M' => {
                let [x, y] = take_numbers::<2>(&tokens, &mut i, command)?;
                if open {
                    builder.end(false);
                }
                pen = Pos2::new(x, y) + base;
                start = pen;
                builder.begin(at(pen));
                open = true;
            }
            'L' => {
                let [x, y] = take_numbers::<2>(&tokens, &mut i, command)?;
                pen = Pos2::new(x, y) + base;
                builder.line_to(at(pen));
            }
            'H' => {
                let [x] = take_numbers::<1>(&tokens, &mut i, command)?;
                pen.x = if relative { pen.x + x } else { x };
                builder.line_to(at(pen));
            }
            'V' => {
                let [y] = take_numbers::<1>(&tokens, &mut i, command)?;
                pen.y = if relative { pen.y + y } else { y };
                builder.line_to(at(pen));
            }
            'Q' => {
                let [cx, cy, x, y] = take_numbers::<4>(&tokens, &mut i, command)?;
                let control = Pos2::new(cx, cy) + base;
                pen = Pos2::new(x, y) + base;
                builder.quadratic_bezier_to(at(control), at(pen));
            }
            'C' => {
                let [c1x, c1y, c2x, c2y, x, y] = take_numbers::<6>(&tokens, &mut i, command)?;
                let c1 = Pos2::new(c1x, c1y) + base;
                let c2 = Pos2::new(c2x, c2y) + base;
                pen = Pos2::new(x, y) + base;
                builder.cubic_bezier_to(at(c1), at(c2), at(pen));
            }
            'Z' => {
                if open {
                    builder.close();
                    open = false;
                }
                pen = start;
            }
            _ => return Err(PathError::UnexpectedCommand(command)),
        }
        last = Some(command);
    }

    if open {
        builder.end(false);
    }
    Ok(flatten(&builder.build()))
}

/// Whether `point` (local frame) lies within `tolerance` of any segment
pub fn hit_test_path(subpaths: &[Vec<Pos2>], point: Pos2, tolerance: f32) -> bool {
    subpaths.iter().any(|sub| {
        sub.windows(2)
            .any(|w| distance_to_line_segment(point, w[0], w[1]) <= tolerance)
    })
}
