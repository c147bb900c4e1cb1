//! Layer filter expressions.
//!
//! Filters are stored exactly as they appear in the style document and
//! evaluated on demand against a [`GeoJsonFeature`]. Both the expression
//! syntax (`["!=", ["get", "name"], "x"]`) and the legacy key syntax
//! (`["==", "$type", "Polygon"]`) are understood, covering the subset of
//! operators layer filters use in practice.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    core::constants::{INDIA_ISO_ALPHA3, ISO_ALPHA3_PROPERTY},
    data::geojson::GeoJsonFeature,
    MapError, Result,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(Value);

impl Expression {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Keeps only polygon and multipolygon features.
    pub fn polygons_only() -> Self {
        Self(json!(["==", "$type", "Polygon"]))
    }

    /// Keeps every feature except the one tagged as India.
    pub fn exclude_india() -> Self {
        Self(json!(["!=", ["get", ISO_ALPHA3_PROPERTY], INDIA_ISO_ALPHA3]))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Evaluates the filter for `feature`. Non-boolean results count as a
    /// rejection, matching the renderer.
    pub fn matches(&self, feature: &GeoJsonFeature) -> Result<bool> {
        Ok(evaluate(&self.0, feature)?.as_bool().unwrap_or(false))
    }

    /// Property keys this filter reads through `get`, `has` or legacy key
    /// comparisons.
    pub fn referenced_properties(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_properties(&self.0, &mut keys);
        keys
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn evaluate(expr: &Value, feature: &GeoJsonFeature) -> Result<Value> {
    let items = match expr {
        Value::Array(items) => items,
        literal => return Ok(literal.clone()),
    };
    let (op, args) = match items.split_first() {
        Some((Value::String(op), args)) => (op.as_str(), args),
        _ => {
            return Err(MapError::ParseError(format!(
                "expression must start with an operator name: {}",
                expr
            ))
            .into())
        }
    };

    match op {
        "literal" => Ok(args.first().cloned().unwrap_or(Value::Null)),
        "get" => {
            let key = string_arg(op, args, 0)?;
            Ok(feature.property(key).cloned().unwrap_or(Value::Null))
        }
        "has" => {
            let key = string_arg(op, args, 0)?;
            Ok(Value::Bool(feature_key(feature, key).is_some()))
        }
        "!has" => {
            let key = string_arg(op, args, 0)?;
            Ok(Value::Bool(feature_key(feature, key).is_none()))
        }
        "geometry-type" => Ok(feature
            .geometry
            .as_ref()
            .map(|g| Value::from(g.type_name()))
            .unwrap_or(Value::Null)),
        "!" => {
            let inner = args.first().ok_or_else(|| arity_error(op))?;
            Ok(Value::Bool(!truthy(&evaluate(inner, feature)?)))
        }
        "all" => {
            for arg in args {
                if !truthy(&evaluate(arg, feature)?) {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        "any" => {
            for arg in args {
                if truthy(&evaluate(arg, feature)?) {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        "==" | "!=" => {
            if args.len() != 2 {
                return Err(arity_error(op));
            }
            let (lhs, rhs) = match &args[0] {
                Value::String(key) => (
                    feature_key(feature, key).unwrap_or(Value::Null),
                    args[1].clone(),
                ),
                other => (evaluate(other, feature)?, evaluate(&args[1], feature)?),
            };
            let equal = values_equal(&lhs, &rhs);
            Ok(Value::Bool(if op == "==" { equal } else { !equal }))
        }
        "in" | "!in" => {
            let key = string_arg(op, args, 0)?;
            let actual = feature_key(feature, key).unwrap_or(Value::Null);
            let found = args[1..].iter().any(|v| values_equal(&actual, v));
            Ok(Value::Bool(if op == "in" { found } else { !found }))
        }
        other => Err(MapError::ParseError(format!("unsupported filter operator '{}'", other)).into()),
    }
}

/// Resolves a legacy filter key: `$type`, `$id`, or a property name.
fn feature_key(feature: &GeoJsonFeature, key: &str) -> Option<Value> {
    match key {
        "$type" => feature
            .geometry
            .as_ref()
            .and_then(|g| g.filter_type_name())
            .map(Value::from),
        "$id" => feature.id.clone(),
        property => feature.property(property).cloned(),
    }
}

fn string_arg<'a>(op: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| arity_error(op))
}

fn arity_error(op: &str) -> Box<dyn std::error::Error + Send + Sync> {
    MapError::ParseError(format!("malformed arguments for '{}'", op)).into()
}

fn truthy(value: &Value) -> bool {
    value.as_bool().unwrap_or(false)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn collect_properties(expr: &Value, keys: &mut Vec<String>) {
    let Value::Array(items) = expr else {
        return;
    };
    let Some(Value::String(op)) = items.first() else {
        return;
    };
    let args = &items[1..];

    match op.as_str() {
        "get" | "has" | "!has" | "in" | "!in" => {
            if let Some(Value::String(key)) = args.first() {
                if !key.starts_with('$') && !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        "==" | "!=" => match args.first() {
            Some(Value::String(key)) if !key.starts_with('$') => {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            _ => args.iter().for_each(|arg| collect_properties(arg, keys)),
        },
        _ => args.iter().for_each(|arg| collect_properties(arg, keys)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::GeoJsonGeometry;

    fn polygon() -> GeoJsonGeometry {
        GeoJsonGeometry::Polygon {
            coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
        }
    }

    fn country(code: &str) -> GeoJsonFeature {
        GeoJsonFeature::new(polygon()).with_property(ISO_ALPHA3_PROPERTY, code)
    }

    #[test]
    fn test_polygons_only_accepts_multipolygons() {
        let filter = Expression::polygons_only();
        let multi = GeoJsonFeature::new(GeoJsonGeometry::MultiPolygon {
            coordinates: Vec::new(),
        });
        let line = GeoJsonFeature::new(GeoJsonGeometry::LineString {
            coordinates: vec![[0.0, 0.0], [1.0, 1.0]],
        });

        assert!(filter.matches(&GeoJsonFeature::new(polygon())).unwrap());
        assert!(filter.matches(&multi).unwrap());
        assert!(!filter.matches(&line).unwrap());
    }

    #[test]
    fn test_exclude_india() {
        let filter = Expression::exclude_india();
        assert!(!filter.matches(&country("IND")).unwrap());
        assert!(filter.matches(&country("PAK")).unwrap());
        assert!(filter.matches(&GeoJsonFeature::new(polygon())).unwrap());
    }

    #[test]
    fn test_geometry_type_is_exact() {
        let filter = Expression::new(json!(["==", ["geometry-type"], "Polygon"]));
        let multi = GeoJsonFeature::new(GeoJsonGeometry::MultiPolygon {
            coordinates: Vec::new(),
        });
        assert!(filter.matches(&GeoJsonFeature::new(polygon())).unwrap());
        assert!(!filter.matches(&multi).unwrap());
    }

    #[test]
    fn test_combinators_and_legacy_forms() {
        let feature = country("NPL").with_property("rank", 2);
        let filter = Expression::new(json!([
            "all",
            ["has", "rank"],
            ["==", "rank", 2.0],
            ["!", ["==", ["get", "iso_3166_1_alpha_3"], "IND"]],
            ["any", ["in", "iso_3166_1_alpha_3", "BTN", "NPL"], false]
        ]));
        assert!(filter.matches(&feature).unwrap());
        assert!(!filter.matches(&country("IND")).unwrap());
    }

    #[test]
    fn test_unsupported_operator() {
        let filter = Expression::new(json!(["within", {}]));
        assert!(filter.matches(&country("IND")).is_err());
    }

    #[test]
    fn test_referenced_properties() {
        assert_eq!(
            Expression::exclude_india().referenced_properties(),
            vec![ISO_ALPHA3_PROPERTY.to_string()]
        );
        assert!(Expression::polygons_only()
            .referenced_properties()
            .is_empty());
    }
}
