macro_rules! impl_perf_value_from {
    ($variant:ident, $target:ty: $($t:ty), *) => {
        $(
            impl From<$t> for PerfValue {
                fn from(value: $t) -> Self {
                    PerfValue::$variant(value as $target)
                }
            }
        )*
    };
}

/// Builds a [Response](crate::Response) from a status, a message and any number of
/// `label => value` performance data pairs. Evaluates to a `Result` since every label gets
/// validated.
///
/// ```rust
/// # #[macro_use]
/// # extern crate icingaplugin;
/// # use icingaplugin::Status;
/// # fn main() {
/// let response = response!(Status::Ok, "fine"; "users" => 27, "load" => 0.5).unwrap();
/// assert_eq!(&response.render(), "OK: fine|users=27;;;; load=0.5;;;;");
/// # }
/// ```
#[macro_export]
macro_rules! response {
    ($status:expr, $message:expr) => {
        $crate::Response::new($status, $message)
    };
    ($status:expr, $message:expr; $( $label:expr => $value:expr ), *) => {
        (|| -> ::core::result::Result<$crate::Response, $crate::PerfDataError> {
            let mut r = $crate::Response::new($status, $message);
            $(
                r.push_perf_data($crate::PerfData::new($label, $value)?);
            )*
            ::core::result::Result::Ok(r)
        })()
    };
}
