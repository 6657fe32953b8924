// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrative boundary model (regions as a GeoJSON FeatureCollection).

use geojson::GeoJson;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Properties carried by every boundary feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionProperties {
    /// Display name (e.g., "Bretagne"). The backend data files use `nom`.
    #[serde(alias = "nom")]
    pub name: String,
    /// INSEE code (e.g., "53")
    #[serde(deserialize_with = "code_from_string_or_number")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
}

/// One administrative boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    pub properties: RegionProperties,
    /// Raw GeoJSON geometry, converted into shapes by the layer builder.
    pub geometry: Option<geojson::Geometry>,
}

impl RegionFeature {
    pub fn new(properties: RegionProperties, geometry: Option<geojson::Geometry>) -> Self {
        Self {
            properties,
            geometry,
        }
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }

    pub fn code(&self) -> &str {
        &self.properties.code
    }

    pub fn population(&self) -> Option<u64> {
        self.properties.population
    }
}

/// Ordered collection of boundary features.
///
/// Order is render order: later features draw on top. Codes are unique and
/// names non-empty; both are checked on construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionCollection {
    features: Vec<RegionFeature>,
}

impl RegionCollection {
    /// Build a collection, checking the per-collection invariants.
    pub fn new(features: Vec<RegionFeature>) -> Result<Self, GeographyError> {
        let mut seen = HashSet::with_capacity(features.len());
        for (index, feature) in features.iter().enumerate() {
            if feature.properties.name.trim().is_empty() {
                return Err(GeographyError::EmptyName { index });
            }
            if !seen.insert(feature.properties.code.as_str()) {
                return Err(GeographyError::DuplicateCode(
                    feature.properties.code.clone(),
                ));
            }
        }
        Ok(Self { features })
    }

    /// Parse a collection from a GeoJSON string.
    pub fn from_json(json_data: &str) -> Result<Self, GeographyError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| GeographyError::Parse(e.to_string()))?;
        Self::from_geojson(geojson)
    }

    /// Convert parsed GeoJSON into a collection.
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, GeographyError> {
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(GeographyError::NotACollection);
        };

        let mut features = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let properties = feature
                .properties
                .ok_or(GeographyError::MissingProperties { index })?;
            let properties: RegionProperties =
                serde_json::from_value(serde_json::Value::Object(properties))
                    .map_err(|e| GeographyError::InvalidProperties {
                        index,
                        reason: e.to_string(),
                    })?;
            features.push(RegionFeature::new(properties, feature.geometry));
        }

        Self::new(features)
    }

    pub fn features(&self) -> &[RegionFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Look up a feature by its administrative code.
    pub fn get(&self, code: &str) -> Option<&RegionFeature> {
        self.features.iter().find(|f| f.properties.code == code)
    }
}

/// INSEE codes are strings, but some exports write them as integers.
fn code_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Number(u64),
    }

    Ok(match RawCode::deserialize(deserializer)? {
        RawCode::Text(code) => code,
        RawCode::Number(code) => code.to_string(),
    })
}

/// Errors from boundary data parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeographyError {
    #[error("Failed to parse GeoJSON: {0}")]
    Parse(String),

    #[error("Expected a GeoJSON FeatureCollection")]
    NotACollection,

    #[error("Feature {index} has no properties")]
    MissingProperties { index: usize },

    #[error("Feature {index} has invalid properties: {reason}")]
    InvalidProperties { index: usize, reason: String },

    #[error("Feature {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Duplicate administrative code: {0}")]
    DuplicateCode(String),
}
