//! Path model shared by every builder.
//!
//! A `Path` is a flat list of segments; corners are `QuadTo` rather than
//! string fragments so callers can flatten, inspect or re-emit them. The SVG
//! path-data writer/reader here only covers what the builders emit plus the
//! `H`/`V` shorthands used by frame walls (absolute commands only).

use std::fmt;

use crate::error::PathParseError;

use super::types::Point;

/// One drawing command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic Bézier from the current point via `ctrl` to `to`.
    QuadTo { ctrl: Point, to: Point },
    Close,
}

impl PathSeg {
    /// End point of the segment (`None` for `Close`).
    #[inline]
    pub fn end(&self) -> Option<Point> {
        match *self {
            PathSeg::MoveTo(p) | PathSeg::LineTo(p) => Some(p),
            PathSeg::QuadTo { to, .. } => Some(to),
            PathSeg::Close => None,
        }
    }
}

/// Sequence of segments. Empty means "nothing to draw".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub segs: Vec<PathSeg>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed polygon through `pts`.
    pub fn polygon(pts: &[Point]) -> Self {
        let mut path = Path::new();
        let Some((first, rest)) = pts.split_first() else {
            return path;
        };
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close();
        path
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.segs.push(PathSeg::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.segs.push(PathSeg::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        self.segs.push(PathSeg::QuadTo { ctrl, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segs.push(PathSeg::Close);
        self
    }

    /// Boundary point sequence: the end point of every non-`Close` segment.
    pub fn vertices(&self) -> Vec<Point> {
        self.segs.iter().filter_map(PathSeg::end).collect()
    }

    /// Polylines, one per subpath; each quadratic arc is sampled `steps` times.
    pub fn flatten(&self, steps: usize) -> Vec<Vec<Point>> {
        let steps = steps.max(1);
        let mut out: Vec<Vec<Point>> = Vec::new();
        let mut cur = Point::zeros();
        for seg in &self.segs {
            match *seg {
                PathSeg::MoveTo(p) => {
                    out.push(vec![p]);
                    cur = p;
                }
                PathSeg::LineTo(p) => {
                    current_polyline(&mut out, cur).push(p);
                    cur = p;
                }
                PathSeg::QuadTo { ctrl, to } => {
                    let line = current_polyline(&mut out, cur);
                    for i in 1..=steps {
                        let t = i as f64 / steps as f64;
                        let u = 1.0 - t;
                        line.push(cur * (u * u) + ctrl * (2.0 * u * t) + to * (t * t));
                    }
                    cur = to;
                }
                PathSeg::Close => {
                    if let Some(start) = out.last().and_then(|l| l.first()) {
                        cur = *start;
                    }
                }
            }
        }
        out
    }

    /// SVG path data (`M x y L x y Q cx cy x y Z`), numbers in shortest round-trip form.
    pub fn to_svg_data(&self) -> String {
        self.to_string()
    }

    /// Parse absolute `M L H V Q Z` path data.
    pub fn parse_svg_data(data: &str) -> Result<Path, PathParseError> {
        PathDataReader::new(data).read()
    }
}

fn current_polyline(out: &mut Vec<Vec<Point>>, cur: Point) -> &mut Vec<Point> {
    if out.is_empty() {
        out.push(vec![cur]);
    }
    let last = out.len() - 1;
    &mut out[last]
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match *seg {
                PathSeg::MoveTo(p) => write!(f, "M {} {}", p.x, p.y)?,
                PathSeg::LineTo(p) => write!(f, "L {} {}", p.x, p.y)?,
                PathSeg::QuadTo { ctrl, to } => {
                    write!(f, "Q {} {} {} {}", ctrl.x, ctrl.y, to.x, to.y)?
                }
                PathSeg::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

struct PathDataReader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> PathDataReader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_separators(&mut self) {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        self.pos += rest.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_separators();
        self.src[self.pos..].chars().next()
    }

    fn at_number(&mut self) -> bool {
        matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
    }

    fn number(&mut self, cmd: char) -> Result<f64, PathParseError> {
        if !self.at_number() {
            return Err(PathParseError::MissingOperand(cmd));
        }
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut end = start;
        if matches!(bytes.get(end), Some(b'-' | b'+')) {
            end += 1;
        }
        while matches!(bytes.get(end), Some(b'0'..=b'9' | b'.')) {
            end += 1;
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            end += 1;
            if matches!(bytes.get(end), Some(b'-' | b'+')) {
                end += 1;
            }
            while matches!(bytes.get(end), Some(b'0'..=b'9')) {
                end += 1;
            }
        }
        let text = &self.src[start..end];
        self.pos = end;
        text.parse::<f64>()
            .map_err(|_| PathParseError::BadNumber(text.to_string()))
    }

    fn point(&mut self, cmd: char) -> Result<Point, PathParseError> {
        let x = self.number(cmd)?;
        let y = self.number(cmd)?;
        Ok(Point::new(x, y))
    }

    fn read(mut self) -> Result<Path, PathParseError> {
        let mut path = Path::new();
        let mut cur: Option<Point> = None;
        let mut subpath_start: Option<Point> = None;
        while let Some(c) = self.peek() {
            let at = self.pos;
            self.pos += c.len_utf8();
            match c {
                'M' => {
                    let p = self.point(c)?;
                    path.move_to(p);
                    cur = Some(p);
                    subpath_start = Some(p);
                    // extra coordinate pairs after M are implicit L
                    while self.at_number() {
                        let p = self.point(c)?;
                        path.line_to(p);
                        cur = Some(p);
                    }
                }
                'L' => loop {
                    let p = self.point(c)?;
                    path.line_to(p);
                    cur = Some(p);
                    if !self.at_number() {
                        break;
                    }
                },
                'H' | 'V' => loop {
                    let from = cur.ok_or(PathParseError::NoCurrentPoint(c))?;
                    let v = self.number(c)?;
                    let p = if c == 'H' {
                        Point::new(v, from.y)
                    } else {
                        Point::new(from.x, v)
                    };
                    path.line_to(p);
                    cur = Some(p);
                    if !self.at_number() {
                        break;
                    }
                },
                'Q' => loop {
                    let ctrl = self.point(c)?;
                    let to = self.point(c)?;
                    path.quad_to(ctrl, to);
                    cur = Some(to);
                    if !self.at_number() {
                        break;
                    }
                },
                'Z' | 'z' => {
                    path.close();
                    cur = subpath_start;
                }
                other => return Err(PathParseError::UnknownCommand(other, at)),
            }
        }
        Ok(path)
    }
}
