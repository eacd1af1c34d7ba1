//! Tree inventory returned by the trees endpoint: a GeoJSON feature collection where every
//! feature is a tree with a `label` and a `height` in meters.

use std::fmt::{Display, Formatter};

use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

use crate::error::ArborError;
use crate::layer::MarkerLayer;

/// Number of features shown in the preview by default.
pub const DEFAULT_PREVIEW_LEN: usize = 5;

/// Feature collection received from the server.
///
/// The raw JSON of the features is kept next to the parsed collection so that the preview shows
/// the features exactly as they were sent, with the original key order.
#[derive(Debug, Clone)]
pub struct TreeCollection {
    raw_features: Vec<Value>,
    collection: FeatureCollection,
}

impl TreeCollection {
    /// Parses a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ArborError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_json_value(value)
    }

    /// Reads the collection from a JSON value. Fails if the value is not a GeoJSON feature
    /// collection.
    pub fn from_json_value(value: Value) -> Result<Self, ArborError> {
        let raw_features = match value.get("features") {
            Some(Value::Array(features)) => features.clone(),
            _ => vec![],
        };

        match GeoJson::from_json_value(value)? {
            GeoJson::FeatureCollection(collection) => Ok(Self {
                raw_features,
                collection,
            }),
            GeoJson::Feature(_) => Err(ArborError::GeoJson(
                "expected a FeatureCollection, got a Feature".into(),
            )),
            GeoJson::Geometry(_) => Err(ArborError::GeoJson(
                "expected a FeatureCollection, got a Geometry".into(),
            )),
        }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    /// Returns true if the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    /// Parsed features.
    pub fn features(&self) -> &[Feature] {
        &self.collection.features
    }

    /// Pretty printed JSON array of the first `count` features (or all of them if there are
    /// fewer), indented with two spaces.
    ///
    /// Numbers are printed the way a browser prints them: integral floats lose their fraction
    /// (`18.0` is shown as `18`).
    pub fn preview(&self, count: usize) -> Result<String, ArborError> {
        let shown: Vec<Value> = self.raw_features[..count.min(self.raw_features.len())]
            .iter()
            .map(integral_floats_as_integers)
            .collect();
        Ok(serde_json::to_string_pretty(&shown)?)
    }

    /// Builds the marker layer with one popup per tree and the summary of the stand.
    ///
    /// Features without geometry are not displayed and not counted. Fails on the first tree
    /// whose properties cannot be read.
    pub fn to_marker_layer(&self) -> Result<(MarkerLayer, StandSummary), ArborError> {
        let mut heights = vec![];
        let layer = MarkerLayer::from_features(self.features(), |index, feature| {
            let properties = TreeProperties::from_feature(index, feature)?;
            heights.push(properties.height);
            Ok(properties.popup())
        })?;

        Ok((layer, StandSummary::from_heights(&heights)))
    }
}

fn integral_floats_as_integers(value: &Value) -> Value {
    match value {
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Value::from(v as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(integral_floats_as_integers).collect()),
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(key, item)| (key.clone(), integral_floats_as_integers(item)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Identifier of a tree, as sent by the server. Cluster labels are numbers, hand-labelled trees
/// have text labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeLabel {
    /// Numeric label.
    Number(serde_json::Number),
    /// Text label.
    Text(String),
    /// Boolean label.
    Bool(bool),
}

impl Display for TreeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeLabel::Number(number) => match (number.as_i64(), number.as_u64(), number.as_f64()) {
                (Some(v), _, _) => write!(f, "{v}"),
                (_, Some(v), _) => write!(f, "{v}"),
                (_, _, Some(v)) => write!(f, "{v}"),
                _ => write!(f, "{number}"),
            },
            TreeLabel::Text(text) => f.write_str(text),
            TreeLabel::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Properties of a tree feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeProperties {
    /// Tree identifier.
    pub label: TreeLabel,
    /// Height in meters.
    pub height: f64,
    /// Any other properties of the feature (`point_count`, `footprint`...).
    #[serde(flatten)]
    pub extra: JsonMap<String, Value>,
}

impl TreeProperties {
    /// Reads the properties of the feature at `index` of the collection.
    pub fn from_feature(index: usize, feature: &Feature) -> Result<Self, ArborError> {
        let properties = feature
            .properties
            .clone()
            .ok_or_else(|| ArborError::invalid_feature(index, "feature has no properties"))?;

        serde_json::from_value(Value::Object(properties))
            .map_err(|err| ArborError::invalid_feature(index, err.to_string()))
    }

    /// Popup text of the tree marker.
    pub fn popup(&self) -> String {
        format!(
            "Tree {}<br/>Height: {} m",
            self.label,
            to_fixed(self.height, 2)
        )
    }
}

/// Aggregated figures of the loaded trees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandSummary {
    /// Number of displayed trees.
    pub num_trees: usize,
    /// Mean height in meters. `None` if there are no trees.
    pub avg_height: Option<f64>,
}

impl StandSummary {
    fn from_heights(heights: &[f64]) -> Self {
        let avg_height =
            (!heights.is_empty()).then(|| heights.iter().sum::<f64>() / heights.len() as f64);

        Self {
            num_trees: heights.len(),
            avg_height,
        }
    }
}

/// Formats the number with exactly `digits` digits after the decimal point.
///
/// Rounding is done on the exact binary value of the number, with ties going away from zero,
/// the same way as `Number.prototype.toFixed` in browsers: `0.125` gives `0.13`, while `1.005`
/// (stored as `1.00499999...`) gives `1.00`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    if abs.is_infinite() {
        return format!("{sign}Infinity");
    }

    if abs >= 1e21 {
        return format!("{sign}{}", format!("{abs:e}").replace('e', "e+"));
    }

    // 1074 fractional digits are enough to print any f64 exactly.
    let exact = format!("{abs:.1074}");
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();

    if frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        round_up(&mut kept);
    }

    let int_len = kept.len() - digits;
    let mut result = String::with_capacity(kept.len() + 2);
    result.push_str(sign);
    result.extend(kept[..int_len].iter().map(|b| *b as char));
    if digits > 0 {
        result.push('.');
        result.extend(kept[int_len..].iter().map(|b| *b as char));
    }

    result
}

fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }

    digits.insert(0, b'1');
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::tests::{OAK_COLLECTION, TREES_COLLECTION};

    #[test]
    fn to_fixed_rounding() {
        assert_eq!(to_fixed(12.345, 2), "12.35");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(9.5, 2), "9.50");
        assert_eq!(to_fixed(9.995, 2), "9.99");
        assert_eq!(to_fixed(99.999, 2), "100.00");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(7.0, 0), "7");
    }

    #[test]
    fn to_fixed_sign_and_special_values() {
        assert_eq!(to_fixed(-1.255, 1), "-1.3");
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 2), "-Infinity");
        assert_eq!(to_fixed(1e21, 2), "1e+21");
    }

    #[test]
    fn popup_text() {
        let collection = TreeCollection::from_slice(OAK_COLLECTION.as_bytes()).expect("valid");
        let properties =
            TreeProperties::from_feature(0, &collection.features()[0]).expect("valid");
        assert_eq!(properties.popup(), "Tree Oak1<br/>Height: 9.50 m");
    }

    #[test]
    fn numeric_labels() {
        let collection = TreeCollection::from_slice(TREES_COLLECTION.as_bytes()).expect("valid");
        let properties =
            TreeProperties::from_feature(0, &collection.features()[0]).expect("valid");
        assert_eq!(properties.label, TreeLabel::Number(3.into()));
        assert_eq!(properties.popup(), "Tree 3<br/>Height: 12.35 m");
        assert_eq!(properties.extra.get("point_count"), Some(&Value::from(120)));
    }

    #[test]
    fn non_numeric_height_fails() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"label":"Oak1","height":"tall"},"geometry":{"type":"Point","coordinates":[10,20]}}
        ]}"#;
        let collection = TreeCollection::from_slice(json.as_bytes()).expect("valid collection");
        assert_matches!(
            collection.to_marker_layer(),
            Err(ArborError::InvalidFeature { index: 0, .. })
        );
    }

    #[test]
    fn feature_without_properties_fails() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":null,"geometry":{"type":"Point","coordinates":[10,20]}}
        ]}"#;
        let collection = TreeCollection::from_slice(json.as_bytes()).expect("valid collection");
        assert_matches!(
            collection.to_marker_layer(),
            Err(ArborError::InvalidFeature { index: 0, .. })
        );
    }

    #[test]
    fn invalid_documents() {
        assert_matches!(
            TreeCollection::from_slice(b"not json"),
            Err(ArborError::Decoding(_))
        );
        assert_matches!(
            TreeCollection::from_slice(br#"{"type":"Point","coordinates":[1,2]}"#),
            Err(ArborError::GeoJson(_))
        );
        assert_matches!(
            TreeCollection::from_slice(br#"{"features":[]}"#),
            Err(ArborError::GeoJson(_))
        );
    }

    #[test]
    fn summary() {
        let collection = TreeCollection::from_slice(TREES_COLLECTION.as_bytes()).expect("valid");
        let (layer, summary) = collection.to_marker_layer().expect("valid");

        assert_eq!(collection.len(), 7);
        assert_eq!(layer.len(), 6);
        assert_eq!(summary.num_trees, 6);
        assert!(summary.avg_height.is_some());

        let empty = TreeCollection::from_slice(br#"{"type":"FeatureCollection","features":[]}"#)
            .expect("valid");
        let (layer, summary) = empty.to_marker_layer().expect("valid");
        assert!(layer.is_empty());
        assert_eq!(
            summary,
            StandSummary {
                num_trees: 0,
                avg_height: None
            }
        );
    }

    #[test]
    fn preview_is_limited() {
        let collection = TreeCollection::from_slice(TREES_COLLECTION.as_bytes()).expect("valid");
        let preview: Vec<Value> =
            serde_json::from_str(&collection.preview(DEFAULT_PREVIEW_LEN).expect("valid"))
                .expect("preview is json");
        assert_eq!(preview.len(), 5);

        let preview: Vec<Value> =
            serde_json::from_str(&collection.preview(100).expect("valid")).expect("json");
        assert_eq!(preview.len(), 7);
    }

    #[test]
    fn preview_prints_integral_floats_as_integers() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"label":4,"height":18.0,"footprint":-0.0,"ratio":0.25},"geometry":{"type":"Point","coordinates":[24.0,60.5]}}
        ]}"#;
        let collection = TreeCollection::from_slice(body.as_bytes()).expect("valid");
        let preview = collection.preview(DEFAULT_PREVIEW_LEN).expect("valid");

        assert!(preview.contains(r#""height": 18,"#));
        assert!(preview.contains(r#""footprint": 0,"#));
        assert!(preview.contains(r#""ratio": 0.25"#));
        assert!(preview.contains("24,"));
        assert!(preview.contains("60.5"));
        assert!(!preview.contains("18.0"));
    }

    #[test]
    fn preview_format() {
        let collection = TreeCollection::from_slice(OAK_COLLECTION.as_bytes()).expect("valid");
        insta::assert_snapshot!(collection.preview(DEFAULT_PREVIEW_LEN).expect("valid"), @r###"
        [
          {
            "type": "Feature",
            "properties": {
              "label": "Oak1",
              "height": 9.5
            },
            "geometry": {
              "type": "Point",
              "coordinates": [
                10,
                20
              ]
            }
          }
        ]
        "###);
    }
}
