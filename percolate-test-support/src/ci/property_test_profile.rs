//! Proptest tuning read from the environment.
//!
//! Property suites across the workspace call [`ProptestRunProfile::load`]
//! so that CI can raise case counts or enable forking in one place.

use std::env;

use thiserror::Error;

/// Environment variable overriding the number of cases per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable enabling forked proptest execution.
pub const PERCOLATE_PBT_FORK_ENV_KEY: &str = "PERCOLATE_PBT_FORK";

/// Reasons an override was ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideError {
    /// The value was not an unsigned integer.
    #[error("expected an unsigned integer: {0}")]
    NotANumber(String),
    /// Zero cases would silently disable the suite.
    #[error("case count must be positive")]
    ZeroCases,
    /// The value was not a recognised boolean spelling.
    #[error("expected one of true/false/1/0/yes/no/on/off")]
    NotABool,
}

/// Case count and fork policy for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads the profile from the environment, keeping each default whose
    /// override is absent or malformed. Malformed overrides are logged at
    /// `warn!`.
    ///
    /// # Examples
    /// ```
    /// use percolate_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(PERCOLATE_PBT_FORK_ENV_KEY, default_fork, parse_bool),
        }
    }

    /// Returns the number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Returns whether each case runs in a forked subprocess.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or<T: Copy>(
    key: &'static str,
    default: T,
    parse: fn(&str) -> Result<T, OverrideError>,
) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|err| {
        tracing::warn!(env = key, raw = %raw, error = %err, "ignoring property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, OverrideError> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(OverrideError::ZeroCases),
        Ok(cases) => Ok(cases),
        Err(err) => Err(OverrideError::NotANumber(err.to_string())),
    }
}

fn parse_bool(raw: &str) -> Result<bool, OverrideError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OverrideError::NotABool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use rstest::rstest;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Restores an environment variable when dropped.
    struct ScopedVar {
        key: &'static str,
        previous: Option<String>,
    }

    impl ScopedVar {
        fn new(key: &'static str, value: Option<&str>) -> Self {
            let previous = env::var(key).ok();
            // SAFETY: every test touching the environment holds ENV_LOCK.
            unsafe {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
            Self { key, previous }
        }
    }

    impl Drop for ScopedVar {
        fn drop(&mut self) {
            // SAFETY: every test touching the environment holds ENV_LOCK.
            unsafe {
                match &self.previous {
                    Some(value) => env::set_var(self.key, value),
                    None => env::remove_var(self.key),
                }
            }
        }
    }

    fn load_with(cases: Option<&str>, fork: Option<&str>, default_fork: bool) -> ProptestRunProfile {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _cases = ScopedVar::new(PROGTEST_CASES_ENV_KEY, cases);
        let _fork = ScopedVar::new(PERCOLATE_PBT_FORK_ENV_KEY, fork);
        ProptestRunProfile::load(48, default_fork)
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let profile = load_with(None, None, false);
        assert_eq!(profile.cases(), 48);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case::one("1", 1)]
    #[case::padded(" 512 ", 512)]
    #[case::large("20000", 20_000)]
    fn case_overrides_are_honoured(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(load_with(Some(raw), None, false).cases(), expected);
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-3")]
    #[case::word("many")]
    fn malformed_case_overrides_fall_back(#[case] raw: &str) {
        assert_eq!(load_with(Some(raw), None, false).cases(), 48);
    }

    #[rstest]
    #[case::word_true("true", true)]
    #[case::shouting("YES", true)]
    #[case::digit_one("1", true)]
    #[case::on("on", true)]
    #[case::word_false("false", false)]
    #[case::digit_zero("0", false)]
    #[case::off("Off", false)]
    fn fork_overrides_are_honoured(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(load_with(None, Some(raw), !expected).fork(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::maybe("maybe")]
    #[case::two("2")]
    fn malformed_fork_overrides_fall_back(#[case] raw: &str) {
        assert!(load_with(None, Some(raw), true).fork());
    }

    #[test]
    fn parse_errors_describe_the_problem() {
        assert_eq!(parse_cases("0"), Err(OverrideError::ZeroCases));
        assert!(matches!(parse_cases("x"), Err(OverrideError::NotANumber(_))));
        assert_eq!(parse_bool("perhaps"), Err(OverrideError::NotABool));
    }
}
