//! Unit/value resolution for property targets.
//!
//! Property names arrive hyphen-case (`margin-left`) or single-token
//! (`marginLeft`) and are normalized to the latter. Values arrive as numbers or
//! numeric strings with an optional unit suffix (`"2em"`, `"50%"`).

use serde::{Deserialize, Serialize};

use crate::error::TweenError;

/// Properties that take a bare number.
pub const UNITLESS: &[&str] = &[
    "opacity",
    "fillOpacity",
    "zIndex",
    "zoom",
    "order",
    "orphans",
    "widows",
    "columnCount",
    "flexGrow",
    "flexShrink",
    "fontWeight",
    "lineHeight",
    "scrollTop",
    "scrollLeft",
];

/// Properties that live on the element itself rather than its style.
pub const ELEMENT_PROPERTIES: &[&str] = &["scrollTop", "scrollLeft"];

/// Raw destination value as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Number(v as f64)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// Numeric destination paired with the unit written after it.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub destination: f64,
    pub unit: String,
}

/// `margin-left` -> `marginLeft`. Single-token names pass through.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `marginLeft` -> `margin-left`, `WebkitTransform` -> `-webkit-transform`.
pub fn css_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn is_unitless(name: &str) -> bool {
    UNITLESS.contains(&name)
}

pub fn is_element_property(name: &str) -> bool {
    ELEMENT_PROPERTIES.contains(&name)
}

/// Length of the longest float literal at the start of `s` (after leading
/// whitespace has been stripped by the caller).
///
/// Grammar: `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
/// An exponent without digits is left in the unit suffix.
fn numeric_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// Split `"12.5px"` into `(12.5, "px")`. Unparsable input yields `(0.0, "")`.
pub fn split_numeric(raw: &str) -> (f64, String) {
    let s = raw.trim();
    let n = numeric_prefix_len(s);
    if n == 0 {
        return (0.0, String::new());
    }
    let value = s[..n].parse::<f64>().unwrap_or(0.0);
    (value, s[n..].trim().to_string())
}

/// Resolve one property's destination and unit. `name` must already be normalized.
pub fn resolve(name: &str, raw: &RawValue, length_unit: &str) -> Resolved {
    match raw {
        RawValue::Text(s) => {
            let (destination, unit) = split_numeric(s);
            Resolved { destination, unit }
        }
        RawValue::Number(v) => Resolved {
            destination: if v.is_finite() { *v } else { 0.0 },
            unit: if is_unitless(name) {
                String::new()
            } else {
                length_unit.to_string()
            },
        },
    }
}

/// Format a value the way it is written to the host: number then unit.
pub fn format_value(value: f64, unit: &str) -> String {
    format!("{value}{unit}")
}

/// Parse a JSON object of `name -> number | string` preserving key order.
pub fn parse_properties_json(json: &str) -> Result<Vec<(String, RawValue)>, TweenError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    properties_from_json(value)
}

pub fn properties_from_json(value: serde_json::Value) -> Result<Vec<(String, RawValue)>, TweenError> {
    let serde_json::Value::Object(map) = value else {
        return Err(TweenError::NotAnObject);
    };
    map.into_iter()
        .map(|(name, v)| match v {
            serde_json::Value::Number(n) => Ok((name, RawValue::Number(n.as_f64().unwrap_or(0.0)))),
            serde_json::Value::String(s) => Ok((name, RawValue::Text(s))),
            other => Err(TweenError::InvalidProperty {
                reason: format!("expected number or string, got {other}"),
                name,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphen_case_is_normalized() {
        assert_eq!(normalize_name("margin-left"), "marginLeft");
        assert_eq!(normalize_name("border-top-width"), "borderTopWidth");
        assert_eq!(normalize_name("opacity"), "opacity");
        assert_eq!(normalize_name("-webkit-transform"), "WebkitTransform");
    }

    #[test]
    fn css_name_inverts_normalization() {
        assert_eq!(css_name("marginLeft"), "margin-left");
        assert_eq!(css_name("WebkitTransform"), "-webkit-transform");
        assert_eq!(css_name("opacity"), "opacity");
    }

    #[test]
    fn strings_split_into_value_and_unit() {
        assert_eq!(split_numeric("12.5px"), (12.5, "px".to_string()));
        assert_eq!(split_numeric(" -3em "), (-3.0, "em".to_string()));
        assert_eq!(split_numeric("50%"), (50.0, "%".to_string()));
        assert_eq!(split_numeric(".5"), (0.5, String::new()));
        assert_eq!(split_numeric("1e2px"), (100.0, "px".to_string()));
        assert_eq!(split_numeric("2em3"), (2.0, "em3".to_string()));
    }

    #[test]
    fn malformed_strings_become_zero() {
        assert_eq!(split_numeric("auto"), (0.0, String::new()));
        assert_eq!(split_numeric(""), (0.0, String::new()));
        assert_eq!(split_numeric("-"), (0.0, String::new()));
        assert_eq!(split_numeric("."), (0.0, String::new()));
    }

    #[test]
    fn numbers_pick_unit_from_allow_list() {
        let r = resolve("opacity", &RawValue::Number(0.5), "px");
        assert_eq!(r, Resolved { destination: 0.5, unit: String::new() });
        let r = resolve("scrollTop", &RawValue::Number(120.0), "px");
        assert_eq!(r.unit, "");
        let r = resolve("width", &RawValue::Number(100.0), "px");
        assert_eq!(r, Resolved { destination: 100.0, unit: "px".into() });
    }

    #[test]
    fn written_values_concatenate_unit() {
        assert_eq!(format_value(10.0, "px"), "10px");
        assert_eq!(format_value(0.25, ""), "0.25");
    }

    #[test]
    fn property_json_keeps_order_and_rejects_non_scalars() {
        let props = parse_properties_json(r#"{ "width": "2em", "opacity": 0.5, "left": 10 }"#).unwrap();
        let names: Vec<_> = props.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["width", "opacity", "left"]);
        assert_eq!(props[0].1, RawValue::Text("2em".into()));

        let err = parse_properties_json(r#"{ "width": true }"#).unwrap_err();
        assert!(matches!(err, TweenError::InvalidProperty { ref name, .. } if name == "width"));
        assert!(matches!(parse_properties_json("[1]"), Err(TweenError::NotAnObject)));
        assert!(matches!(parse_properties_json("{"), Err(TweenError::Json(_))));
    }
}
