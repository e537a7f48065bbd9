use std::fmt;
use std::str::FromStr;

/// Errors which can occur while parsing a threshold range like `@10:20`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeParseError {
    #[error("range must not be empty")]
    Empty,
    #[error("range cannot have more than two parts")]
    TooManyParts,
    #[error("invalid start value: {0}")]
    InvalidStart(String),
    #[error("invalid end value: {0}")]
    InvalidEnd(String),
    #[error("start must be less than or equal to end ({start} > {end})")]
    StartGreaterThanEnd { start: f64, end: f64 },
}

/// A threshold range in the format used by nagios and icinga plugins.
///
/// | Text     | Alerts when          |
/// |----------|----------------------|
/// | `10`     | `< 0` or `> 10`      |
/// | `10:`    | `< 10`               |
/// | `~:10`   | `> 10`               |
/// | `10:20`  | `< 10` or `> 20`     |
/// | `@10:20` | `>= 10` and `<= 20`  |
///
/// `~` stands for negative or positive infinity depending on the side.
///
/// ```rust
/// # use icingaplugin::Range;
/// let range: Range = "10:20".parse().unwrap();
/// assert!(range.is_match(5.0));
/// assert!(!range.is_match(15.0));
/// assert_eq!(range.to_string(), "10:20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    start: f64,
    end: f64,
    inclusive: bool,
}

impl Range {
    /// Creates a range from its bounds. Use [f64::NEG_INFINITY] and [f64::INFINITY] for
    /// unbounded sides.
    pub fn new(start: f64, end: f64, inclusive: bool) -> Result<Self, RangeParseError> {
        if start.is_nan() {
            return Err(RangeParseError::InvalidStart(start.to_string()));
        }
        if end.is_nan() {
            return Err(RangeParseError::InvalidEnd(end.to_string()));
        }
        if start > end {
            return Err(RangeParseError::StartGreaterThanEnd { start, end });
        }

        Ok(Range {
            start,
            end,
            inclusive,
        })
    }

    /// Parses a range from its textual form `[@]start:end`.
    pub fn parse(text: &str) -> Result<Self, RangeParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RangeParseError::Empty);
        }

        let (inclusive, text) = match text.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if text.is_empty() {
            return Err(RangeParseError::Empty);
        }

        let mut parts = text.split(':');
        let first = parts.next().unwrap_or_default();
        let (start, end) = match (parts.next(), parts.next()) {
            (None, _) => ("", first.trim()),
            (Some(end), None) => (first.trim(), end.trim()),
            (Some(_), Some(_)) => return Err(RangeParseError::TooManyParts),
        };

        let start = match start {
            "" => 0.0,
            "~" => f64::NEG_INFINITY,
            s => parse_bound(s).ok_or_else(|| RangeParseError::InvalidStart(s.to_owned()))?,
        };

        let end = match end {
            "" | "~" => f64::INFINITY,
            s => parse_bound(s).ok_or_else(|| RangeParseError::InvalidEnd(s.to_owned()))?,
        };

        Range::new(start, end, inclusive)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// True if the range was given with a leading `@`.
    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// Plain interval membership, both bounds included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }

    /// Returns true if the given value should raise an alert: the value lies outside of the
    /// range, or inside of it if the range is inclusive (`@`).
    pub fn is_match(&self, value: f64) -> bool {
        if self.inclusive {
            self.contains(value)
        } else {
            value < self.start || value > self.end
        }
    }
}

fn parse_bound(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FromStr for Range {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::parse(s)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inclusive {
            f.write_str("@")?;
        }

        if self.start == f64::NEG_INFINITY {
            f.write_str("~:")?;
        } else if self.start != 0.0 {
            write!(f, "{}:", self.start)?;
        }

        if self.end == f64::INFINITY {
            f.write_str("~")
        } else {
            write!(f, "{}", self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors() {
        assert_eq!(Range::parse(""), Err(RangeParseError::Empty));
        assert_eq!(Range::parse("   "), Err(RangeParseError::Empty));
        assert_eq!(Range::parse("@"), Err(RangeParseError::Empty));
        assert_eq!(Range::parse("10:20:30"), Err(RangeParseError::TooManyParts));
        assert_eq!(
            Range::parse("bad:10"),
            Err(RangeParseError::InvalidStart("bad".to_owned()))
        );
        assert_eq!(
            Range::parse("10:bad"),
            Err(RangeParseError::InvalidEnd("bad".to_owned()))
        );
        assert_eq!(
            Range::parse("20:10"),
            Err(RangeParseError::StartGreaterThanEnd {
                start: 20.0,
                end: 10.0
            })
        );
        assert!(Range::parse("inf").is_err());
        assert!(Range::parse("NaN:10").is_err());
        assert!(Range::parse("1 0:20").is_err());

        assert!(matches!(
            Range::new(f64::NAN, 1.0, false),
            Err(RangeParseError::InvalidStart(_))
        ));
        assert!(matches!(
            Range::new(1.0, f64::NAN, true),
            Err(RangeParseError::InvalidEnd(_))
        ));
        assert!(Range::new(f64::NEG_INFINITY, f64::INFINITY, false).is_ok());
    }

    #[test]
    fn test_parse_forms() {
        let range = Range::parse("10").unwrap();
        assert_eq!(range.start(), 0.0);
        assert_eq!(range.end(), 10.0);
        assert!(!range.is_inclusive());

        let range = Range::parse("10:").unwrap();
        assert_eq!(range.start(), 10.0);
        assert_eq!(range.end(), f64::INFINITY);

        let range = Range::parse(":10").unwrap();
        assert_eq!(range.start(), 0.0);
        assert_eq!(range.end(), 10.0);

        let range = Range::parse("~:20").unwrap();
        assert_eq!(range.start(), f64::NEG_INFINITY);
        assert_eq!(range.end(), 20.0);

        let range = Range::parse("10:~").unwrap();
        assert_eq!(range.start(), 10.0);
        assert_eq!(range.end(), f64::INFINITY);

        let range = Range::parse("10:10").unwrap();
        assert_eq!(range.start(), 10.0);
        assert_eq!(range.end(), 10.0);

        let range = Range::parse("10 : 20").unwrap();
        assert_eq!(range.start(), 10.0);
        assert_eq!(range.end(), 20.0);

        let range = Range::parse("@ ~ : 5").unwrap();
        assert_eq!(range.start(), f64::NEG_INFINITY);
        assert_eq!(range.end(), 5.0);
        assert!(range.is_inclusive());

        let range = Range::parse(" @-5.5:2.25 ").unwrap();
        assert_eq!(range.start(), -5.5);
        assert_eq!(range.end(), 2.25);
        assert!(range.is_inclusive());
    }

    #[test]
    fn test_is_match_outside_by_default() {
        let range = Range::parse("10:20").unwrap();
        assert!(range.is_match(5.0));
        assert!(range.is_match(9.0));
        assert!(!range.is_match(10.0));
        assert!(!range.is_match(15.0));
        assert!(!range.is_match(20.0));
        assert!(range.is_match(21.0));
        assert!(range.is_match(25.0));
    }

    #[test]
    fn test_is_match_inclusive() {
        let range = Range::parse("@10:20").unwrap();
        assert!(range.is_match(10.0));
        assert!(range.is_match(15.0));
        assert!(range.is_match(20.0));
        assert!(!range.is_match(5.0));
        assert!(!range.is_match(25.0));
    }

    #[test]
    fn test_is_match_unbounded() {
        let range = Range::parse("~:50").unwrap();
        assert!(!range.is_match(-1000.0));
        assert!(!range.is_match(50.0));
        assert!(range.is_match(51.0));

        let never = Range::parse("~:~").unwrap();
        let always = Range::parse("@~:~").unwrap();
        for value in [f64::MIN, -1.0, 0.0, 1.0, f64::MAX] {
            assert!(!never.is_match(value));
            assert!(always.is_match(value));
        }
    }

    #[test]
    fn test_contains_is_not_is_match() {
        let range = Range::parse("10:20").unwrap();
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(5.0));
        assert!(!range.is_match(15.0));
    }

    #[test]
    fn test_range_as_string() {
        for text in ["10", "10:20", "20", "~:10", "@10:15", "@~:~", "10:~", "-5:2.5"] {
            assert_eq!(Range::parse(text).unwrap().to_string(), text);
        }

        assert_eq!(Range::parse("10:").unwrap().to_string(), "10:~");
        assert_eq!(Range::parse("0:30").unwrap().to_string(), "30");
        assert_eq!(Range::parse(":5").unwrap().to_string(), "5");
    }

    #[test]
    fn test_round_trip_keeps_behaviour() {
        let values = [-100.0, -1.0, 0.0, 4.5, 10.0, 15.0, 20.0, 30.0, 1e9];
        for text in ["10:20", "@10:20", "~:50", "5:", "@0:~", "27", "-3:-1", "@:7"] {
            let range = Range::parse(text).unwrap();
            let reparsed = Range::parse(&range.to_string()).unwrap();
            assert_eq!(range, reparsed);
            for value in values {
                assert_eq!(range.is_match(value), reparsed.is_match(value));
            }
        }
    }
}
