//! GeoJSON feature collection for map overlays.
//!
//! The document is written as a JavaScript assignment so a web page can load
//! it with a plain `<script>` tag:
//!
//! ```text
//! var attackers={"type":"FeatureCollection","features":[...]}
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Token written before the JSON document
pub const VARIABLE_PREFIX: &str = "var attackers=";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Properties {
    pub name: String,
    #[serde(rename = "popupContent")]
    pub popup_content: String,
}

impl Feature {
    pub fn point(lon: f64, lat: f64, properties: Properties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: [lon, lat],
            },
            properties,
        }
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// Writes `var attackers=` followed by the collection as JSON.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot write to file (check permissions?): {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(VARIABLE_PREFIX.as_bytes())?;
    serde_json::to_writer(&mut writer, collection).context("Failed to serialize GeoJSON")?;
    writer.flush()?;
    Ok(())
}
