//! Parser for `.fcl` boundary files: header lines naming a group, followed by
//! one `LAT;LNG;` line per vertex.
//!
//! ```text
//! // tower sector
//! SKQU_TWR;
//! N004.41.52.000;W074.09.00.000;
//! N004.42.00.000;W074.08.00.000;
//! ```

use std::fmt::{self, Display};
use std::io;

use geo::{Coord, LineString, Polygon};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::dms::{dms_to_decimal, format_latitude, format_longitude};

use super::read_to_string;

const COMMENT_PREFIX: &str = "//";

static COORDINATE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[NSEW][0-9]").unwrap());

#[derive(Error, Debug)]
pub enum FclError {
    #[error("failed to read .fcl file: {0}")]
    FileRead(#[from] io::Error),
}

/// A named boundary. Vertices are stored as `x` = second token, `y` = first
/// token of each coordinate line, i.e. (longitude, latitude).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Group {
    pub id: String,
    pub vertices: Vec<Coord>,
}

impl Group {
    pub fn polygon(&self) -> Polygon {
        Polygon::new(LineString::from(self.vertices.clone()), vec![])
    }
}

/// Groups in file order. Redeclaring an id replaces its vertices but keeps its
/// original position.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Fcl(IndexMap<String, Group>);

pub type FclResult = Result<Fcl, FclError>;

enum FclLine<'a> {
    Coordinate(&'a str),
    Header(&'a str),
    Ignored,
}

impl<'a> FclLine<'a> {
    fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            Self::Ignored
        } else if COORDINATE_LINE_RE.is_match(line) {
            Self::Coordinate(line)
        } else if let Some((id, _)) = line.split_once(';') {
            Self::Header(id.trim())
        } else {
            Self::Ignored
        }
    }
}

/// Lines terminated by `\r\n`, `\n` or a lone `\r`.
fn split_lines(unparsed_file: &str) -> impl Iterator<Item = &str> {
    unparsed_file
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\r', '\n']))
}

fn parse_vertex(line: &str) -> Option<Coord> {
    let mut fields = line.split(';').map(str::trim).filter(|f| !f.is_empty());
    let lat = fields.next()?;
    let lng = fields.next()?;
    Some(Coord {
        x: dms_to_decimal(lng)?,
        y: dms_to_decimal(lat)?,
    })
}

impl Fcl {
    pub fn parse(contents: &[u8]) -> FclResult {
        let unparsed_file = read_to_string(contents)?;
        Ok(Self::parse_str(&unparsed_file))
    }

    /// Malformed lines never fail the parse, they only drop the affected
    /// vertex. Groups left without vertices are removed.
    pub fn parse_str(unparsed_file: &str) -> Self {
        let mut groups = IndexMap::<String, Group>::new();
        let mut current: Option<String> = None;

        for (line_number, line) in split_lines(unparsed_file).enumerate() {
            match FclLine::classify(line) {
                FclLine::Coordinate(line) => {
                    let Some(group) = current.as_ref().and_then(|id| groups.get_mut(id)) else {
                        debug!("line {}: coordinate outside of a group", line_number + 1);
                        continue;
                    };
                    match parse_vertex(line) {
                        Some(vertex) => group.vertices.push(vertex),
                        None => debug!("line {}: invalid coordinate {line:?}", line_number + 1),
                    }
                }
                FclLine::Header("") => {
                    debug!("line {}: header without id", line_number + 1);
                    current = None;
                }
                FclLine::Header(id) => {
                    groups.insert(
                        id.to_string(),
                        Group {
                            id: id.to_string(),
                            vertices: vec![],
                        },
                    );
                    current = Some(id.to_string());
                }
                FclLine::Ignored => (),
            }
        }

        groups.retain(|id, group| {
            if group.vertices.is_empty() {
                debug!("dropping group {id} without valid coordinates");
            }
            !group.vertices.is_empty()
        });

        Self(groups)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Group> {
        self.0.get(id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.0.values()
    }

    /// All vertices of all groups.
    pub fn vertices(&self) -> impl Iterator<Item = Coord> + '_ {
        self.groups()
            .flat_map(|group| group.vertices.iter().copied())
    }
}

impl FromIterator<Group> for Fcl {
    fn from_iter<I: IntoIterator<Item = Group>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter(|group| !group.vertices.is_empty())
                .map(|group| (group.id.clone(), group))
                .collect(),
        )
    }
}

impl Display for Fcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in self.groups() {
            writeln!(f, "{};", group.id)?;
            for vertex in &group.vertices {
                writeln!(
                    f,
                    "{};{};",
                    format_latitude(vertex.y),
                    format_longitude(vertex.x)
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use geo::{coord, Coord};
    use pretty_assertions_sorted::assert_eq_sorted;

    use super::{Fcl, Group};

    fn ids(fcl: &Fcl) -> Vec<&str> {
        fcl.groups().map(|group| group.id.as_str()).collect()
    }

    #[test]
    fn test_single_group() {
        let fcl_str = "SKQU_TWR;
N004.41.52.000;W074.09.00.000;
N004.42.00.000;W074.08.00.000;
";

        let fcl = Fcl::parse(fcl_str.as_bytes()).unwrap();

        assert_eq!(fcl.len(), 1);
        assert_eq_sorted!(
            fcl.get("SKQU_TWR"),
            Some(&Group {
                id: "SKQU_TWR".to_string(),
                vertices: vec![
                    coord! {
                        x: -(74.0 + 9.0 / 60.0 + 0.0 / 3600.0),
                        y: 4.0 + 41.0 / 60.0 + 52.0 / 3600.0,
                    },
                    coord! {
                        x: -(74.0 + 8.0 / 60.0 + 0.0 / 3600.0),
                        y: 4.0 + 42.0 / 60.0 + 0.0 / 3600.0,
                    },
                ],
            })
        );
    }

    #[test]
    fn test_header_with_extra_fields() {
        let fcl = Fcl::parse_str(
            "  SKBO_APP ; Bogota approach ; 118.1
            N001.00.00;E002.00.00
",
        );

        assert_eq!(ids(&fcl), ["SKBO_APP"]);
        assert_eq!(
            fcl.get("SKBO_APP").unwrap().vertices,
            [coord! { x: 2.0, y: 1.0 }]
        );
    }

    #[test]
    fn test_empty_group_is_dropped() {
        let fcl = Fcl::parse_str(
            "EMPTY;
// nothing here
FULL;
N001.00.00;E001.00.00;
",
        );

        assert_eq!(ids(&fcl), ["FULL"]);
    }

    #[test]
    fn test_only_comments() {
        let fcl = Fcl::parse_str("// a comment\n\n   \n// N001.00.00;E001.00.00;\n");
        assert!(fcl.is_empty());
    }

    #[test]
    fn test_redeclared_group_keeps_position() {
        let fcl = Fcl::parse_str(
            "A;
N001.00.00;E001.00.00;
N002.00.00;E002.00.00;
B;
N003.00.00;E003.00.00;
A;
N004.00.00;E004.00.00;
",
        );

        assert_eq!(ids(&fcl), ["A", "B"]);
        assert_eq!(
            fcl.get("A").unwrap().vertices,
            [coord! { x: 4.0, y: 4.0 }]
        );
    }

    #[test]
    fn test_malformed_vertices_are_skipped() {
        let fcl = Fcl::parse_str(
            "N009.00.00;E009.00.00;
SECTOR;
N12;E001.00.00;
N001.00.00;
N001.00.00;E001;
N001.00.00;;E002.00.00;
S001.30.00;W002.30.00.500;
not a coordinate
",
        );

        assert_eq!(ids(&fcl), ["SECTOR"]);
        assert_eq!(
            fcl.get("SECTOR").unwrap().vertices,
            [
                coord! { x: 2.0, y: 1.0 },
                coord! {
                    x: -(2.0 + 30.0 / 60.0 + 0.5 / 3600.0),
                    y: -1.5,
                },
            ]
        );
    }

    #[test]
    fn test_lowercase_coordinate_line_is_a_header() {
        let fcl = Fcl::parse_str(
            "n001.00.00;e001.00.00;
N001.00.00;e002.00.00;
",
        );

        assert_eq!(ids(&fcl), ["n001.00.00"]);
        assert_eq!(
            fcl.get("n001.00.00").unwrap().vertices,
            [coord! { x: 2.0, y: 1.0 }]
        );
    }

    #[test]
    fn test_header_without_id_closes_group() {
        let fcl = Fcl::parse_str(
            "A;
N001.00.00;E001.00.00;
 ; unnamed
N002.00.00;E002.00.00;
",
        );

        assert_eq!(
            fcl.get("A").unwrap().vertices,
            [coord! { x: 1.0, y: 1.0 }]
        );
        assert_eq!(fcl.len(), 1);
    }

    #[test]
    fn test_crlf() {
        let fcl = Fcl::parse_str("A;\r\nN001.00.00;E001.00.00;\r\n");
        assert_eq!(fcl.vertices().collect::<Vec<Coord>>(), [coord! { x: 1.0, y: 1.0 }]);
    }

    #[test]
    fn test_cr_only() {
        let fcl = Fcl::parse_str("A;\rN001.00.00;E001.00.00;\rN002.00.00;E002.00.00;\r");

        assert_eq!(ids(&fcl), ["A"]);
        assert_eq!(
            fcl.get("A").unwrap().vertices,
            [coord! { x: 1.0, y: 1.0 }, coord! { x: 2.0, y: 2.0 }]
        );
    }

    #[test]
    fn test_mixed_line_endings() {
        let fcl = Fcl::parse_str("A;\r\nN001.00.00;E001.00.00;\rB;\nN002.00.00;E002.00.00;");

        assert_eq!(ids(&fcl), ["A", "B"]);
        assert_eq!(fcl.vertices().count(), 2);
    }

    #[test]
    fn test_win_1252_ids() {
        let fcl = Fcl::parse(b"ZONE_\xe9;\nN001.00.00;E001.00.00;\n").unwrap();
        assert_eq!(ids(&fcl), ["ZONE_\u{e9}"]);
    }

    #[test]
    fn test_display_roundtrip() {
        let fcl_str = "SKQU_TWR;
N004.41.52.000;W074.09.00.000;
N004.42.00.000;W074.08.00.000;
N005.15.44.694;W074.08.30.250;
SKQU_GND;
S000.30.00.000;E000.00.10.000;
S000.31.00.000;E000.00.20.000;
";

        let parsed = Fcl::parse_str(fcl_str);

        assert_eq_sorted!(parsed.to_string(), fcl_str);
        assert_eq!(ids(&Fcl::parse_str(&parsed.to_string())), ids(&parsed));
    }

    #[test]
    fn test_polygon_is_closed() {
        let fcl = Fcl::parse_str(
            "A;
N001.00.00;E001.00.00;
N002.00.00;E001.00.00;
N002.00.00;E002.00.00;
",
        );

        let polygon = fcl.get("A").unwrap().polygon();
        assert_eq!(polygon.exterior().0.len(), 4);
        assert!(polygon.exterior().is_closed());
    }

    #[test]
    fn test_from_iter_drops_empty_groups() {
        let fcl: Fcl = [
            Group {
                id: "A".to_string(),
                vertices: vec![],
            },
            Group {
                id: "B".to_string(),
                vertices: vec![coord! { x: 0.0, y: 0.0 }],
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(ids(&fcl), ["B"]);
    }
}
