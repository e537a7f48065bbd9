use std::fmt;

/// Represents the outcome of a check.
///
/// The variants are ordered by severity: `Ok < Warning < Critical < Unknown`. An unknown result
/// is treated as the worst one so an indeterminate check is never hidden behind another state
/// when results get aggregated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Returns the corresponding exit code to signal the service state of self.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// The short label used in the plugin output.
    pub const fn label(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARN",
            Status::Critical => "CRIT",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Returns the more severe of both statuses.
    pub fn worse_of(a: Status, b: Status) -> Status {
        a.max(b)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::Warning.exit_code(), 1);
        assert_eq!(Status::Critical.exit_code(), 2);
        assert_eq!(Status::Unknown.exit_code(), 3);

        assert_eq!(&Status::Ok.to_string(), "OK");
        assert_eq!(&Status::Warning.to_string(), "WARN");
        assert_eq!(&Status::Critical.to_string(), "CRIT");
        assert_eq!(&Status::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_ordering() {
        assert!(Status::Ok < Status::Warning);
        assert!(Status::Warning < Status::Critical);
        assert!(Status::Critical < Status::Unknown);

        assert_eq!(Status::worse_of(Status::Ok, Status::Warning), Status::Warning);
        assert_eq!(Status::worse_of(Status::Critical, Status::Warning), Status::Critical);
        assert_eq!(Status::worse_of(Status::Critical, Status::Unknown), Status::Unknown);
        assert_eq!(Status::worse_of(Status::Ok, Status::Ok), Status::Ok);
    }
}
