use std::fmt::{self, Display};
use std::io;
use std::path::{Path, PathBuf};

use fs_err as fs;
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    colour::{Colour, BACKGROUND, PALETTE},
    fcl::{Fcl, Group},
    view::{ViewTransform, DEFAULT_VIEW_SIZE},
};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Error, Debug)]
pub enum SvgError {
    #[error("no groups with valid coordinates to render")]
    Empty,
    #[error("failed to write svg file: {0}")]
    FileWrite(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("failed to deserialize style: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("style palette must contain at least one colour")]
    EmptyPalette,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SvgStyle {
    /// Side length of the square canvas the boundaries are fitted into.
    pub view_size: f64,
    /// Padding around the canvas on every side.
    pub margin: f64,
    pub background: Colour,
    pub palette: Vec<Colour>,
    pub fill_opacity: f64,
    pub stroke_width: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            view_size: DEFAULT_VIEW_SIZE,
            margin: 50.0,
            background: BACKGROUND,
            palette: PALETTE.to_vec(),
            fill_opacity: 0.1,
            stroke_width: 1.5,
        }
    }
}

impl SvgStyle {
    /// Reads a JSON style, every field falling back to its default.
    pub fn parse(contents: &[u8]) -> Result<Self, StyleError> {
        let style: Self = serde_json::from_slice(contents)?;
        if style.palette.is_empty() {
            return Err(StyleError::EmptyPalette);
        }
        Ok(style)
    }

    pub fn colour(&self, index: usize) -> Colour {
        let palette = if self.palette.is_empty() {
            &PALETTE[..]
        } else {
            &self.palette[..]
        };
        palette[index % palette.len()]
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RenderMode {
    /// All groups in one document.
    #[default]
    Combined,
    /// One document per group, in a directory named after the output path.
    Split,
}

pub struct SvgRenderer<'a> {
    style: &'a SvgStyle,
    transform: ViewTransform,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(fcl: &Fcl, style: &'a SvgStyle) -> Result<Self, SvgError> {
        let transform = ViewTransform::new(fcl, style.view_size).ok_or(SvgError::Empty)?;
        Ok(Self { style, transform })
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn render(&self, fcl: &Fcl) -> String {
        SvgDocument {
            renderer: self,
            groups: fcl.groups().enumerate().collect(),
        }
        .to_string()
    }

    /// Renders a single group as a document of its own, coloured with the
    /// first palette entry.
    pub fn render_group(&self, group: &Group) -> String {
        SvgDocument {
            renderer: self,
            groups: vec![(0, group)],
        }
        .to_string()
    }

    fn points(&self, group: &Group) -> String {
        group
            .vertices
            .iter()
            .map(|vertex| self.transform.project(*vertex))
            .map(|point| format!("{:.2},{:.2}", point.x, point.y))
            .join(" ")
    }
}

struct SvgDocument<'r, 'g> {
    renderer: &'r SvgRenderer<'r>,
    groups: Vec<(usize, &'g Group)>,
}

impl Display for SvgDocument<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.renderer.style;
        let origin = -style.margin;
        let extent = style.view_size + 2.0 * style.margin;
        writeln!(
            f,
            r#"<svg viewBox="{origin} {origin} {extent} {extent}" xmlns="{SVG_NAMESPACE}" style="background:{};">"#,
            style.background
        )?;

        for &(index, group) in &self.groups {
            let colour = style.colour(index);
            writeln!(f, r#"  <g id="{}">"#, group.id)?;
            writeln!(
                f,
                r#"    <polygon points="{}" fill="{colour}" fill-opacity="{}" stroke="{colour}" stroke-width="{}" />"#,
                self.renderer.points(group),
                style.fill_opacity,
                style.stroke_width
            )?;
            writeln!(f, "  </g>")?;
        }

        write!(f, "</svg>")
    }
}

/// Directory receiving split output: the output path without its extension.
pub fn split_dir(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Renders `fcl` and writes it to disk, overwriting existing files. Returns
/// the written paths in group order.
pub fn write_svg(
    fcl: &Fcl,
    style: &SvgStyle,
    path: &Path,
    mode: RenderMode,
) -> Result<Vec<PathBuf>, SvgError> {
    let renderer = SvgRenderer::new(fcl, style)?;

    match mode {
        RenderMode::Combined => {
            fs::write(path, renderer.render(fcl))?;
            info!("wrote {} groups to {}", fcl.len(), path.display());
            Ok(vec![path.to_path_buf()])
        }
        RenderMode::Split => {
            let dir = split_dir(path);
            fs::create_dir_all(&dir)?;
            fcl.groups()
                .map(|group| -> Result<PathBuf, SvgError> {
                    let group_path = dir.join(format!("{}.svg", group.id));
                    fs::write(&group_path, renderer.render_group(group))?;
                    info!("wrote {} to {}", group.id, group_path.display());
                    Ok(group_path)
                })
                .collect()
        }
    }
}
