//! Scalar cell values and display formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value stored in a single worksheet cell.
///
/// Serialized untagged, so a document holds `null`, `true`, `1234.5` or
/// `"text"` directly. Non-finite numbers have no JSON literal and are stored
/// as `{"number": "NaN"}`, `{"number": "inf"}` or `{"number": "-inf"}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell.
    #[default]
    Empty,

    /// Boolean cell.
    Bool(bool),

    /// Numeric cell.
    Number(#[serde(with = "number_repr")] f64),

    /// Text cell.
    Text(String),
}

impl CellValue {
    /// Type a raw input string the way a spreadsheet types typed-in data.
    ///
    /// Blank input is `Empty`, `TRUE`/`FALSE` are booleans, finite numbers
    /// (optionally grouped with `,` every three digits) are `Number`, and
    /// everything else stays `Text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use poprank_sheet::CellValue;
    ///
    /// assert_eq!(CellValue::from_input(" 1250 "), CellValue::Number(1250.0));
    /// assert_eq!(CellValue::from_input("1,234,567"), CellValue::Number(1234567.0));
    /// assert_eq!(CellValue::from_input(""), CellValue::Empty);
    /// assert_eq!(CellValue::from_input("n/a"), CellValue::Text("n/a".to_string()));
    /// ```
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        match trimmed.parse::<f64>().ok().or_else(|| parse_grouped(trimmed)) {
            Some(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// The numeric payload, if this cell holds a number.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether this cell holds a number.
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Whether this cell is blank.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Short type label used in diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    /// Render the value under a number format such as `#,##` or `#,##0.00`.
    ///
    /// Non-numeric values ignore the format.
    pub fn format_with(&self, number_format: Option<&str>) -> String {
        match (self, number_format) {
            (Self::Number(n), Some(pattern)) => format_number(*n, pattern),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// Accepts `1,234,567` and `-12,000.5`; the separators must fall every three digits.
fn parse_grouped(text: &str) -> Option<f64> {
    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let mut groups = int_part.split(',');
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !all_digits(head) {
        return None;
    }
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
        grouped = true;
    }
    if !grouped || !all_digits(frac_part) {
        return None;
    }
    text.replace(',', "").parse().ok()
}

mod number_repr {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Finite(f64),
        NonFinite { number: String },
    }

    pub(super) fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            return serializer.serialize_f64(*value);
        }
        let label = if value.is_nan() {
            "NaN"
        } else if value.is_sign_positive() {
            "inf"
        } else {
            "-inf"
        };
        Repr::NonFinite {
            number: label.to_string(),
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Finite(n) => Ok(n),
            Repr::NonFinite { number } => match number.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!(
                    "unknown non-finite number {other:?}"
                ))),
            },
        }
    }
}

/// Format a number with a thousands-separator pattern.
///
/// Supports `General`, and patterns built from `#`, `0`, `,` and one `.`.
/// A pattern with no `0` in its integer part renders zero as an empty
/// integer part, matching spreadsheet behaviour for `#,##`.
pub fn format_number(value: f64, pattern: &str) -> String {
    if !value.is_finite() || pattern.eq_ignore_ascii_case("general") || pattern.is_empty() {
        return CellValue::Number(value).to_string();
    }

    let (int_pattern, frac_pattern) = pattern.split_once('.').unwrap_or((pattern, ""));
    let grouped = int_pattern.contains(',');
    let decimals = frac_pattern.chars().filter(|c| matches!(c, '0' | '#')).count();
    let int_required = int_pattern.contains('0');

    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_digits, frac_digits) = rounded.split_once('.').unwrap_or((&rounded, ""));

    let mut int_part = if int_digits == "0" && !int_required {
        String::new()
    } else if grouped {
        group_thousands(int_digits)
    } else {
        int_digits.to_string()
    };

    let frac_trimmed = trim_optional_decimals(frac_digits, frac_pattern);
    if !frac_trimmed.is_empty() {
        int_part.push('.');
        int_part.push_str(&frac_trimmed);
    }

    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{}", int_part)
    } else {
        int_part
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// `#` positions after the point drop trailing zeros, `0` positions keep them.
fn trim_optional_decimals(digits: &str, frac_pattern: &str) -> String {
    let required = frac_pattern.chars().filter(|c| *c == '0').count();
    let mut out: String = digits.to_string();
    while out.len() > required && out.ends_with('0') {
        out.pop();
    }
    out
}
