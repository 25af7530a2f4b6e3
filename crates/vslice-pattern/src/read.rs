//! Parsing of the vector slicer's text output.
//!
//! The slicer writes one file per pattern. Header lines are `key: value`
//! comments; each layer is a block of path lines between `# Start of
//! pattern` and `# End of pattern` markers, one comma-separated list of
//! `x,y` coordinates per path. An optional sibling overlap file mirrors the
//! structure with one overlap fraction per point.

use std::fs;
use std::path::Path;

use log::warn;

use crate::error::{PatternError, Result};
use crate::layer::Layer;
use crate::path::PrintPath;
use crate::pattern::Pattern;
use crate::Point2;

const LAYER_START: &str = "# Start of pattern";
const LAYER_END: &str = "# End of pattern";

const KEY_PRINT_DIAMETER: &str = "Print diameter";
const KEY_SOURCE_DIRECTORY: &str = "Source directory";
const KEY_CREATION_DATE: &str = "Creation date";

/// Parse a pattern from slicer output text.
///
/// `overlap_text` is the matching overlap file, when present; it is ignored
/// with a warning if its creation date or structure disagrees with the paths
/// file. `fallback_name` is used when the header carries no source name.
pub fn parse_pattern(
    paths_text: &str,
    overlap_text: Option<&str>,
    fallback_name: &str,
) -> Result<Pattern> {
    let pixel_path_width = parse_print_diameter(paths_text)?;
    let name = find_key(paths_text, KEY_SOURCE_DIRECTORY)
        .unwrap_or_else(|_| fallback_name.to_string());

    let coordinate_blocks = split_layers(paths_text);
    if coordinate_blocks.iter().all(|b| b.is_empty()) {
        return Err(PatternError::EmptyPattern);
    }

    let overlap_blocks = overlap_text
        .filter(|overlap| creation_dates_match(paths_text, overlap))
        .map(split_layers);

    let mut layers = Vec::with_capacity(coordinate_blocks.len());
    for (layer_index, block) in coordinate_blocks.iter().enumerate() {
        let mut paths = Vec::with_capacity(block.len());
        for (path_index, line) in block.iter().enumerate() {
            let points = parse_path_line(line, layer_index, path_index)?;
            paths.push(PrintPath::new(points));
        }
        layers.push(Layer::new(paths));
    }

    if let Some(overlap_blocks) = overlap_blocks {
        attach_overlaps(&mut layers, &overlap_blocks);
    }

    Ok(Pattern {
        name,
        pixel_path_width,
        layers,
    })
}

/// Read a pattern from a paths file.
///
/// Overlap data is only looked up when the file sits in a directory named
/// `paths`, matching the slicer's output layout; the sibling is then
/// `../overlap/<file name>`.
pub fn load_pattern(paths_file: &Path) -> Result<Pattern> {
    let paths_text = fs::read_to_string(paths_file).map_err(|source| PatternError::Io {
        path: paths_file.display().to_string(),
        source,
    })?;

    let overlap_text = sibling_overlap_file(paths_file)
        .filter(|p| p.exists())
        .and_then(|p| fs::read_to_string(p).ok());

    let stem = paths_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    parse_pattern(&paths_text, overlap_text.as_deref(), &stem)
}

/// `<dir>/paths/<name>.csv` -> `<dir>/overlap/<name>.csv`
fn sibling_overlap_file(paths_file: &Path) -> Option<std::path::PathBuf> {
    let name = paths_file.file_name()?;
    let parent = paths_file.parent()?;
    if parent.file_name()? != "paths" {
        return None;
    }
    Some(parent.parent()?.join("overlap").join(name))
}

/// Find the value of a `key: value` header line.
///
/// Exactly one line must contain the key; the value is everything after the
/// first colon, trimmed. Values may themselves contain colons, as timestamps
/// do.
pub fn find_key(text: &str, key: &str) -> Result<String> {
    let mut matches = text.lines().filter(|line| line.contains(key));
    let line = matches
        .next()
        .ok_or_else(|| PatternError::MissingKey(key.to_string()))?;
    if matches.next().is_some() {
        return Err(PatternError::AmbiguousKey(key.to_string()));
    }
    let value = line.split_once(':').map_or("", |(_, v)| v).trim();
    Ok(value.to_string())
}

fn parse_print_diameter(text: &str) -> Result<f64> {
    let value = find_key(text, KEY_PRINT_DIAMETER)?;
    let width: f64 = value.parse().map_err(|_| PatternError::InvalidValue {
        key: KEY_PRINT_DIAMETER.to_string(),
        value: value.clone(),
    })?;
    if !width.is_finite() || width <= 0.0 {
        return Err(PatternError::InvalidValue {
            key: KEY_PRINT_DIAMETER.to_string(),
            value,
        });
    }
    Ok(width)
}

fn creation_dates_match(paths_text: &str, overlap_text: &str) -> bool {
    match (
        find_key(paths_text, KEY_CREATION_DATE),
        find_key(overlap_text, KEY_CREATION_DATE),
    ) {
        (Ok(a), Ok(b)) if a == b => true,
        (Ok(_), Ok(_)) => {
            warn!("path and overlap files have different creation dates; variable width disabled");
            false
        }
        _ => {
            warn!("overlap data missing a creation date; variable width disabled");
            false
        }
    }
}

/// Split the data lines into per-layer blocks of raw path lines.
fn split_layers(text: &str) -> Vec<Vec<&str>> {
    let mut layers = Vec::new();
    let mut current = Vec::new();
    let mut reading = false;
    for line in text.lines() {
        if line == LAYER_START {
            reading = true;
        } else if line == LAYER_END {
            reading = false;
            layers.push(std::mem::take(&mut current));
        } else if reading && !line.trim().is_empty() {
            current.push(line);
        }
    }
    layers
}

/// Parse one comma-separated line of `x,y` coordinates.
fn parse_path_line(line: &str, layer_index: usize, path_index: usize) -> Result<Vec<Point2>> {
    let malformed = |reason: String| PatternError::MalformedPath {
        layer_index,
        path_index,
        reason,
    };

    let values: Vec<f64> = line
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| malformed(e.to_string()))?;

    if values.is_empty() {
        return Err(malformed("path has no coordinates".to_string()));
    }
    if values.len() % 2 != 0 {
        return Err(malformed(format!(
            "odd number of coordinate values ({})",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(malformed("non-finite coordinate".to_string()));
    }

    Ok(values
        .chunks_exact(2)
        .map(|xy| Point2::new(xy[0], xy[1]))
        .collect())
}

/// Attach overlap fractions to paths when the overlap file mirrors the
/// structure of the paths file exactly; otherwise drop it with a warning.
fn attach_overlaps(layers: &mut [Layer], overlap_blocks: &[Vec<&str>]) {
    let parsed: Option<Vec<Vec<Vec<f64>>>> = overlap_blocks
        .iter()
        .map(|block| {
            block
                .iter()
                .map(|line| {
                    line.split(',')
                        .map(|v| v.trim().parse::<f64>().ok())
                        .collect::<Option<Vec<f64>>>()
                })
                .collect()
        })
        .collect();

    let Some(parsed) = parsed else {
        warn!("overlap file contains unparsable values; variable width disabled");
        return;
    };

    let structure_matches = parsed.len() == layers.len()
        && layers.iter().zip(&parsed).all(|(layer, block)| {
            layer.paths.len() == block.len()
                && layer
                    .paths
                    .iter()
                    .zip(block)
                    .all(|(path, overlap)| path.len() == overlap.len())
        });

    if !structure_matches {
        warn!("overlap file does not match path structure; variable width disabled");
        return;
    }

    for (layer, block) in layers.iter_mut().zip(parsed) {
        for (path, overlap) in layer.paths.iter_mut().zip(block) {
            path.overlap = Some(overlap);
        }
    }
}
