// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Boundary layer builder.
//!
//! Turns a [`RegionCollection`] into an [`OverlayLayer`]: one styled shape per
//! feature, each with popup content and hover transitions. Building is pure and
//! independent of any map instance; the controller attaches the result.

use crate::models::{BoundaryStyle, RegionCollection, RegionFeature};
use geo::{Centroid, MultiPolygon, Point, Polygon};

/// Fill opacity of a hovered shape, whatever the base style says.
pub const HIGHLIGHT_FILL_OPACITY: f64 = 0.3;

/// Identity of an attached overlay layer, assigned by the map controller
/// on first attach and scoped to that controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// What an overlay represents. Two overlays of the same kind are equivalent:
/// the map shows at most one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Regions,
}

/// Boundary geometry - either a simple polygon or multi-polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl BoundaryGeometry {
    /// Convert a GeoJSON geometry, rejecting empty or non-areal geometries.
    pub fn from_geojson(value: &geojson::Value) -> Result<Self, LayerError> {
        match value {
            geojson::Value::Polygon(rings) => {
                check_rings(rings)?;
                let polygon: Polygon<f64> = value
                    .clone()
                    .try_into()
                    .map_err(|e: geojson::Error| LayerError::InvalidCoordinates(e.to_string()))?;
                Ok(Self::Polygon(polygon))
            }
            geojson::Value::MultiPolygon(polygons) => {
                if polygons.is_empty() {
                    return Err(LayerError::EmptyGeometry);
                }
                for rings in polygons {
                    check_rings(rings)?;
                }
                let multi: MultiPolygon<f64> = value
                    .clone()
                    .try_into()
                    .map_err(|e: geojson::Error| LayerError::InvalidCoordinates(e.to_string()))?;
                Ok(Self::MultiPolygon(multi))
            }
            other => Err(LayerError::UnsupportedGeometry(geometry_type_name(other))),
        }
    }

    /// Point the popup is anchored to.
    pub fn anchor(&self) -> Option<Point<f64>> {
        match self {
            BoundaryGeometry::Polygon(p) => p.centroid(),
            BoundaryGeometry::MultiPolygon(mp) => mp.centroid(),
        }
    }

    pub fn polygon_count(&self) -> usize {
        match self {
            BoundaryGeometry::Polygon(_) => 1,
            BoundaryGeometry::MultiPolygon(mp) => mp.0.len(),
        }
    }
}

fn check_rings(rings: &[Vec<Vec<f64>>]) -> Result<(), LayerError> {
    let Some(exterior) = rings.first() else {
        return Err(LayerError::EmptyGeometry);
    };
    if exterior.is_empty() {
        return Err(LayerError::EmptyGeometry);
    }
    // geojson's conversion indexes positions directly, so short or
    // non-finite positions have to be caught here.
    for position in rings.iter().flatten() {
        if position.len() < 2 || !position[0].is_finite() || !position[1].is_finite() {
            return Err(LayerError::InvalidCoordinates(format!(
                "bad position {:?}",
                position
            )));
        }
    }
    Ok(())
}

fn geometry_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Language used for popup labels and digit grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopupLocale {
    /// `Code : 53`, `3 364 000` (narrow no-break space)
    #[default]
    French,
    /// `Code: 53`, `3,364,000`
    English,
}

impl PopupLocale {
    fn group_separator(self) -> char {
        match self {
            PopupLocale::French => '\u{202f}',
            PopupLocale::English => ',',
        }
    }

    fn label(self, label: &str, value: &str) -> String {
        match self {
            PopupLocale::French => format!("{label} : {value}"),
            PopupLocale::English => format!("{label}: {value}"),
        }
    }

    /// Format an integer with this locale's thousands grouping.
    pub fn group_digits(self, value: u64) -> String {
        let digits = value.to_string();
        let separator = self.group_separator();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(separator);
            }
            out.push(ch);
        }
        out
    }
}

/// Informational content shown when a shape is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    title: String,
    lines: Vec<String>,
}

impl PopupContent {
    pub fn for_feature(feature: &RegionFeature, locale: PopupLocale) -> Self {
        let mut lines = vec![locale.label("Code", feature.code())];
        if let Some(population) = feature.population() {
            lines.push(locale.label("Population", &locale.group_digits(population)));
        }
        Self {
            title: feature.name().to_string(),
            lines,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Plain text, one line per row.
    pub fn text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// HTML fragment for renderers that take markup.
    pub fn to_html(&self) -> String {
        let mut html = format!("<strong>{}</strong>", escape_html(&self.title));
        for line in &self.lines {
            html.push_str("<br/>");
            html.push_str(&escape_html(line));
        }
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One rendered boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryShape {
    code: String,
    name: String,
    geometry: BoundaryGeometry,
    style: BoundaryStyle,
    rest_fill_opacity: f64,
    popup: PopupContent,
    hovered: bool,
}

impl BoundaryShape {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &BoundaryGeometry {
        &self.geometry
    }

    /// Current visual style (rest style, or highlighted while hovered).
    pub fn style(&self) -> &BoundaryStyle {
        &self.style
    }

    pub fn popup(&self) -> &PopupContent {
        &self.popup
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Pointer entered the shape: highlight the fill.
    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.style.fill_opacity = HIGHLIGHT_FILL_OPACITY;
    }

    /// Pointer left the shape: restore the rest fill opacity.
    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.style.fill_opacity = self.rest_fill_opacity;
    }
}

/// A feature the builder could not turn into a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    pub code: String,
    pub error: LayerError,
}

/// All shapes of one collection, attached to and detached from the map as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    id: Option<OverlayId>,
    kind: OverlayKind,
    shapes: Vec<BoundaryShape>,
    skipped: Vec<SkippedFeature>,
}

impl OverlayLayer {
    /// `None` until the layer has been attached to a map.
    pub fn id(&self) -> Option<OverlayId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: OverlayId) {
        self.id = Some(id);
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    /// Shapes in render order.
    pub fn shapes(&self) -> &[BoundaryShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedFeature] {
        &self.skipped
    }

    pub fn shape(&self, code: &str) -> Option<&BoundaryShape> {
        self.shapes.iter().find(|s| s.code == code)
    }

    pub fn shape_mut(&mut self, code: &str) -> Option<&mut BoundaryShape> {
        self.shapes.iter_mut().find(|s| s.code == code)
    }

    /// Return every hovered shape to its rest style.
    pub fn clear_hover(&mut self) {
        for shape in self.shapes.iter_mut().filter(|s| s.hovered) {
            shape.pointer_leave();
        }
    }
}

/// What to do when a feature's geometry cannot be rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip the feature, log a warning, render the rest.
    #[default]
    SkipAndWarn,
    /// Fail the whole build.
    Abort,
}

/// Builds overlay layers with a fixed style and popup locale.
#[derive(Debug, Clone, Default)]
pub struct LayerBuilder {
    style: BoundaryStyle,
    locale: PopupLocale,
    policy: FailurePolicy,
}

impl LayerBuilder {
    pub fn new(style: BoundaryStyle) -> Self {
        Self {
            style,
            locale: PopupLocale::default(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_locale(mut self, locale: PopupLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn style(&self) -> &BoundaryStyle {
        &self.style
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Build one shape from one feature.
    pub fn build_shape(&self, feature: &RegionFeature) -> Result<BoundaryShape, LayerError> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(LayerError::MissingGeometry)?;
        let geometry = BoundaryGeometry::from_geojson(&geometry.value)?;

        Ok(BoundaryShape {
            code: feature.code().to_string(),
            name: feature.name().to_string(),
            geometry,
            style: self.style.clone(),
            rest_fill_opacity: self.style.fill_opacity,
            popup: PopupContent::for_feature(feature, self.locale),
            hovered: false,
        })
    }

    /// Build the overlay for a whole collection, honoring the failure policy.
    ///
    /// Under `SkipAndWarn` this never fails; under `Abort` the first feature
    /// that cannot be rendered fails the build.
    pub fn build(&self, collection: &RegionCollection) -> Result<OverlayLayer, LayerError> {
        match self.policy {
            FailurePolicy::SkipAndWarn => Ok(self.build_skipping(collection)),
            FailurePolicy::Abort => {
                let shapes = collection
                    .features()
                    .iter()
                    .map(|feature| self.build_shape(feature))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::assemble(shapes, Vec::new()))
            }
        }
    }

    fn build_skipping(&self, collection: &RegionCollection) -> OverlayLayer {
        let mut shapes = Vec::with_capacity(collection.len());
        let mut skipped = Vec::new();

        for feature in collection.features() {
            match self.build_shape(feature) {
                Ok(shape) => shapes.push(shape),
                Err(error) => {
                    tracing::warn!(
                        code = %feature.code(),
                        name = %feature.name(),
                        error = %error,
                        "Skipping boundary feature"
                    );
                    skipped.push(SkippedFeature {
                        code: feature.code().to_string(),
                        error,
                    });
                }
            }
        }

        Self::assemble(shapes, skipped)
    }

    fn assemble(shapes: Vec<BoundaryShape>, skipped: Vec<SkippedFeature>) -> OverlayLayer {
        let layer = OverlayLayer {
            id: None,
            kind: OverlayKind::Regions,
            shapes,
            skipped,
        };
        tracing::debug!(
            shapes = layer.shapes.len(),
            skipped = layer.skipped.len(),
            "Built boundary overlay"
        );
        layer
    }
}

/// Build an overlay with the default popup locale, skipping bad features.
pub fn build(collection: &RegionCollection, style: &BoundaryStyle) -> OverlayLayer {
    LayerBuilder::new(style.clone()).build_skipping(collection)
}

/// Per-feature geometry errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error("Feature has no geometry")]
    MissingGeometry,

    #[error("Geometry is empty")]
    EmptyGeometry,

    #[error("Unsupported geometry type {0} (expected Polygon or MultiPolygon)")]
    UnsupportedGeometry(&'static str),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(PopupLocale::English.group_digits(0), "0");
        assert_eq!(PopupLocale::English.group_digits(999), "999");
        assert_eq!(PopupLocale::English.group_digits(1000), "1,000");
        assert_eq!(PopupLocale::English.group_digits(3_364_000), "3,364,000");
        assert_eq!(
            PopupLocale::French.group_digits(12_317_279),
            "12\u{202f}317\u{202f}279"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("Provence-Alpes-Côte d'Azur <b>"),
            "Provence-Alpes-Côte d&#39;Azur &lt;b&gt;"
        );
    }

    #[test]
    fn test_unsupported_geometry() {
        let point = geojson::Value::Point(vec![2.35, 48.85]);
        assert_eq!(
            BoundaryGeometry::from_geojson(&point),
            Err(LayerError::UnsupportedGeometry("Point"))
        );
    }

    #[test]
    fn test_empty_geometries() {
        assert_eq!(
            BoundaryGeometry::from_geojson(&geojson::Value::Polygon(vec![])),
            Err(LayerError::EmptyGeometry)
        );
        assert_eq!(
            BoundaryGeometry::from_geojson(&geojson::Value::Polygon(vec![vec![]])),
            Err(LayerError::EmptyGeometry)
        );
        assert_eq!(
            BoundaryGeometry::from_geojson(&geojson::Value::MultiPolygon(vec![])),
            Err(LayerError::EmptyGeometry)
        );
    }

    #[test]
    fn test_short_position_rejected() {
        let polygon = geojson::Value::Polygon(vec![vec![vec![1.0], vec![2.0, 3.0]]]);
        assert!(matches!(
            BoundaryGeometry::from_geojson(&polygon),
            Err(LayerError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_anchor_is_centroid() {
        let square = geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![2.0, 0.0],
            vec![2.0, 2.0],
            vec![0.0, 2.0],
            vec![0.0, 0.0],
        ]]);
        let geometry = BoundaryGeometry::from_geojson(&square).expect("valid square");
        let anchor = geometry.anchor().expect("non-degenerate polygon");
        assert!((anchor.x() - 1.0).abs() < 1e-9);
        assert!((anchor.y() - 1.0).abs() < 1e-9);
    }
}
