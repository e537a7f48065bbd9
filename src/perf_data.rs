use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::Range;

/// Characters which have a meaning in the plugin output and thus can't be part of a label.
const RESERVED_LABEL_CHARS: [char; 3] = ['=', '\'', '|'];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PerfDataError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("label {label:?} contains the reserved character {character:?}")]
    ReservedCharacter { label: String, character: char },
    #[error("{field} must be a finite number, got {value}")]
    InvalidValue { field: &'static str, value: f64 },
    #[error("minimum {min} is greater than maximum {max}")]
    MinGreaterThanMax { min: PerfValue, max: PerfValue },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid unit of measurement {0:?}")]
pub struct UnitError(String);

/// A numeric value of a performance metric.
///
/// Integers are kept as such so they are rendered exactly as given, floats are rendered without
/// trailing zeros.
#[derive(Debug, Clone, Copy)]
pub enum PerfValue {
    Integer(i128),
    Float(f64),
}

impl PerfValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            PerfValue::Integer(i) => *i as f64,
            PerfValue::Float(f) => *f,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            PerfValue::Integer(_) => true,
            PerfValue::Float(f) => f.is_finite(),
        }
    }
}

impl_perf_value_from!(Integer, i128: i8, i16, i32, i64, isize);
impl_perf_value_from!(Integer, i128: u8, u16, u32, u64, usize);
impl_perf_value_from!(Float, f64: f32, f64);

/// Compares the numbers, not the variants. Two integers compare exactly, anything involving a
/// float compares as `f64`.
impl PartialEq for PerfValue {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for PerfValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (PerfValue::Integer(a), PerfValue::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for PerfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerfValue::Integer(i) => write!(f, "{}", i),
            PerfValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A custom unit of measurement which is known to be valid in the perf data output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitString(String);

impl UnitString {
    /// Checks the given unit. A unit must not be empty and must not contain digits, whitespace
    /// or any of `;=|'-.`, otherwise it could not be told apart from the value.
    pub fn new(unit: &str) -> Result<Self, UnitError> {
        let invalid = unit.is_empty()
            || unit.chars().any(|c| {
                c.is_ascii_digit() || c.is_whitespace() || matches!(c, ';' | '=' | '|' | '\'' | '-' | '.')
            });

        if invalid {
            return Err(UnitError(unit.to_owned()));
        }

        Ok(UnitString(unit.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Unit {
    #[default]
    None,
    Seconds,
    Milliseconds,
    Microseconds,
    Percentage,
    Bytes,
    KiloBytes,
    MegaBytes,
    GigaBytes,
    TeraBytes,
    Counter,
    Other(UnitString),
}

impl Unit {
    pub fn as_str(&self) -> &str {
        match self {
            Unit::None => "",
            Unit::Seconds => "s",
            Unit::Milliseconds => "ms",
            Unit::Microseconds => "us",
            Unit::Percentage => "%",
            Unit::Bytes => "B",
            Unit::KiloBytes => "KB",
            Unit::MegaBytes => "MB",
            Unit::GigaBytes => "GB",
            Unit::TeraBytes => "TB",
            Unit::Counter => "c",
            Unit::Other(unit) => unit.as_str(),
        }
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.to_ascii_lowercase().as_str() {
            "" => Unit::None,
            "s" => Unit::Seconds,
            "ms" => Unit::Milliseconds,
            "us" => Unit::Microseconds,
            "%" => Unit::Percentage,
            "b" => Unit::Bytes,
            "kb" => Unit::KiloBytes,
            "mb" => Unit::MegaBytes,
            "gb" => Unit::GigaBytes,
            "tb" => Unit::TeraBytes,
            "c" => Unit::Counter,
            _ => Unit::Other(UnitString::new(s)?),
        };

        Ok(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single performance metric of a response, rendered as
/// `label=value[uom];[warn];[crit];[min];[max]`.
///
/// ```rust
/// # use icingaplugin::{PerfData, Range, Unit};
/// let perf_data = PerfData::new("users", 27)?
///     .with_warning(Range::parse("0:40")?)
///     .with_critical(Range::parse("0:60")?)
///     .with_min(0)?;
/// assert_eq!(&perf_data.render(), "users=27;40;60;0;");
///
/// let perf_data = PerfData::new("load", 0.25)?.with_unit(Unit::Percentage);
/// assert_eq!(&perf_data.render(), "load=0.25%;;;;");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PerfData {
    label: String,
    value: PerfValue,
    unit: Unit,
    warning: Option<Range>,
    critical: Option<Range>,
    min: Option<PerfValue>,
    max: Option<PerfValue>,
}

impl PerfData {
    /// Creates a metric without unit, thresholds and bounds. Fails if the label is empty or
    /// contains whitespace, `=`, `'` or `|`.
    pub fn new(label: &str, value: impl Into<PerfValue>) -> Result<Self, PerfDataError> {
        if label.is_empty() {
            return Err(PerfDataError::EmptyLabel);
        }

        if let Some(character) = label
            .chars()
            .find(|c| c.is_whitespace() || RESERVED_LABEL_CHARS.contains(c))
        {
            return Err(PerfDataError::ReservedCharacter {
                label: label.to_owned(),
                character,
            });
        }

        Ok(PerfData {
            label: label.to_owned(),
            value: check_finite("value", value.into())?,
            unit: Unit::None,
            warning: None,
            critical: None,
            min: None,
            max: None,
        })
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_warning(mut self, warning: Range) -> Self {
        self.warning = Some(warning);
        self
    }

    pub fn with_critical(mut self, critical: Range) -> Self {
        self.critical = Some(critical);
        self
    }

    pub fn with_min(mut self, min: impl Into<PerfValue>) -> Result<Self, PerfDataError> {
        self.min = Some(check_finite("minimum", min.into())?);
        self.check_bounds()?;
        Ok(self)
    }

    pub fn with_max(mut self, max: impl Into<PerfValue>) -> Result<Self, PerfDataError> {
        self.max = Some(check_finite("maximum", max.into())?);
        self.check_bounds()?;
        Ok(self)
    }

    fn check_bounds(&self) -> Result<(), PerfDataError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => {
                Err(PerfDataError::MinGreaterThanMax { min, max })
            }
            _ => Ok(()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> PerfValue {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn warning(&self) -> Option<&Range> {
        self.warning.as_ref()
    }

    pub fn critical(&self) -> Option<&Range> {
        self.critical.as_ref()
    }

    pub fn min(&self) -> Option<PerfValue> {
        self.min
    }

    pub fn max(&self) -> Option<PerfValue> {
        self.max
    }

    /// Returns the perf data fragment. Absent fields are left empty but keep their separator.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn check_finite(field: &'static str, value: PerfValue) -> Result<PerfValue, PerfDataError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PerfDataError::InvalidValue {
            field,
            value: value.as_f64(),
        })
    }
}

fn fmt_optional<T: fmt::Display>(value: Option<&T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}{};{};{};{};{}",
            self.label,
            self.value,
            self.unit,
            fmt_optional(self.warning.as_ref()),
            fmt_optional(self.critical.as_ref()),
            fmt_optional(self.min.as_ref()),
            fmt_optional(self.max.as_ref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_perf_data() {
        let perf_data = PerfData::new("foo", 7).unwrap();
        assert_eq!(&perf_data.render(), "foo=7;;;;");
        assert_eq!(perf_data.label(), "foo");
        assert_eq!(perf_data.value(), PerfValue::Integer(7));
        assert_eq!(perf_data.warning(), None);
        assert_eq!(perf_data.critical(), None);

        assert_eq!(&PerfData::new("zero", 0).unwrap().render(), "zero=0;;;;");
        assert_eq!(&PerfData::new("neg", -3).unwrap().render(), "neg=-3;;;;");
        assert_eq!(&PerfData::new("f", 1.5).unwrap().render(), "f=1.5;;;;");
        assert_eq!(&PerfData::new("f", 27.0).unwrap().render(), "f=27;;;;");
        assert_eq!(&PerfData::new("big", u64::MAX).unwrap().render(), "big=18446744073709551615;;;;");
    }

    #[test]
    fn test_include_other_values() {
        let perf_data = PerfData::new("foo", 1)
            .unwrap()
            .with_unit("b".parse().unwrap())
            .with_warning(Range::parse("10:20").unwrap())
            .with_critical(Range::parse("20:30").unwrap())
            .with_min(1)
            .unwrap()
            .with_max(5)
            .unwrap();
        assert_eq!(&perf_data.render(), "foo=1B;10:20;20:30;1;5");

        let perf_data = PerfData::new("t", 0.5)
            .unwrap()
            .with_unit(Unit::Seconds)
            .with_max(10)
            .unwrap();
        assert_eq!(&perf_data.render(), "t=0.5s;;;;10");

        let perf_data = PerfData::new("in", 3)
            .unwrap()
            .with_critical(Range::parse("@~:~").unwrap());
        assert_eq!(&perf_data.render(), "in=3;;@~:~;;");
    }

    #[test]
    fn test_reserved_label_characters() {
        assert_eq!(PerfData::new("", 1), Err(PerfDataError::EmptyLabel));

        for (label, character) in [
            ("with=", '='),
            ("I have spaces", ' '),
            ("tab\there", '\t'),
            ("quote'", '\''),
            ("pi|pe", '|'),
        ] {
            assert_eq!(
                PerfData::new(label, 7),
                Err(PerfDataError::ReservedCharacter {
                    label: label.to_owned(),
                    character
                })
            );
        }
    }

    #[test]
    fn test_min_greater_than_max() {
        let result = PerfData::new("x", 1)
            .unwrap()
            .with_min(u64::MAX)
            .unwrap()
            .with_max(u64::MAX - 1);
        assert!(matches!(result, Err(PerfDataError::MinGreaterThanMax { .. })));

        let result = PerfData::new("x", 1)
            .unwrap()
            .with_min(i64::MAX)
            .unwrap()
            .with_max(i64::MAX - 1);
        assert!(matches!(result, Err(PerfDataError::MinGreaterThanMax { .. })));

        let result = PerfData::new("x", 1)
            .unwrap()
            .with_min(i64::MAX - 1)
            .unwrap()
            .with_max(i64::MAX);
        assert!(result.is_ok());

        let result = PerfData::new("foo", 7).unwrap().with_min(10).unwrap().with_max(5);
        assert_eq!(
            result,
            Err(PerfDataError::MinGreaterThanMax {
                min: PerfValue::Integer(10),
                max: PerfValue::Integer(5)
            })
        );

        let result = PerfData::new("foo", 7).unwrap().with_max(0.5).unwrap().with_min(1);
        assert!(matches!(result, Err(PerfDataError::MinGreaterThanMax { .. })));

        assert!(PerfData::new("foo", 7).unwrap().with_min(5).unwrap().with_max(5).is_ok());
    }

    #[test]
    fn test_perf_value_ordering() {
        assert!(PerfValue::Integer(100) > PerfValue::Float(1.0));
        assert!(PerfValue::Float(0.5) < PerfValue::Integer(1));
        assert!(PerfValue::Integer(u64::MAX as i128) > PerfValue::Integer(u64::MAX as i128 - 1));
        assert_eq!(PerfValue::Integer(2), PerfValue::Float(2.0));
        assert_ne!(PerfValue::Integer(2), PerfValue::Integer(3));
        assert_eq!(
            PerfValue::Float(1.5).partial_cmp(&PerfValue::Integer(-3)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_non_finite_values() {
        assert!(matches!(
            PerfData::new("foo", f64::NAN),
            Err(PerfDataError::InvalidValue { field: "value", .. })
        ));
        assert!(matches!(
            PerfData::new("foo", 1).unwrap().with_max(f64::INFINITY),
            Err(PerfDataError::InvalidValue { field: "maximum", .. })
        ));
    }

    #[test]
    fn test_unit_of_measurement() {
        for (text, unit) in [
            ("", Unit::None),
            ("s", Unit::Seconds),
            ("%", Unit::Percentage),
            ("B", Unit::Bytes),
            ("KB", Unit::KiloBytes),
            ("mb", Unit::MegaBytes),
            ("GB", Unit::GigaBytes),
            ("TB", Unit::TeraBytes),
            ("c", Unit::Counter),
        ] {
            assert_eq!(text.parse::<Unit>().unwrap(), unit);
        }

        assert_eq!(
            "km".parse::<Unit>().unwrap(),
            Unit::Other(UnitString::new("km").unwrap())
        );
        assert_eq!(Unit::KiloBytes.to_string(), "KB");
        assert_eq!(Unit::Microseconds.to_string(), "us");

        for invalid in ["p1", "by tes", "a;b", "x=", "-", "."] {
            assert!(invalid.parse::<Unit>().is_err(), "{invalid} should be rejected");
        }
        assert!(UnitString::new("").is_err());
    }
}
