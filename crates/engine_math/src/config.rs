//! Runtime configuration for the math layer.
//!
//! The only knob today is the NaN diagnostic: when enabled, every checked
//! rotation operation resets a NaN-contaminated result to its default value
//! (identity quaternion or zero rotator) and logs a warning. When disabled the
//! check is a no-op and NaNs propagate.
//!
//! The initial value comes from the `nan-checks` cargo feature. Processes can
//! override it with [`MathConfig::install`], typically after
//! [`MathConfig::from_env`].

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

/// The environment variable used to override the NaN diagnostic flag.
pub const NAN_CHECKS_ENV: &str = "ENGINE_MATH_NAN_CHECKS";

static NAN_CHECKS: AtomicBool = AtomicBool::new(cfg!(feature = "nan-checks"));

/// Returns `true` if the NaN diagnostic is currently enabled.
#[must_use]
#[inline]
pub fn nan_checks_enabled() -> bool {
    NAN_CHECKS.load(Ordering::Relaxed)
}

/// Process-wide math configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathConfig {
    /// Reset NaN-contaminated rotations to their defaults.
    pub nan_checks: bool,
}

impl MathConfig {
    /// Create a config with the compile-time defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nan_checks: cfg!(feature = "nan-checks"),
        }
    }

    /// Create a config from the compile-time defaults, overridden by
    /// [`NAN_CHECKS_ENV`] when it holds a recognised boolean.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new().with_env_value(std::env::var(NAN_CHECKS_ENV).ok().as_deref())
    }

    /// Apply a raw [`NAN_CHECKS_ENV`] value. Unset or unrecognised values
    /// leave the config unchanged.
    fn with_env_value(self, value: Option<&str>) -> Self {
        match value.and_then(parse_flag) {
            Some(enabled) => self.with_nan_checks(enabled),
            None => self,
        }
    }

    /// Override the NaN diagnostic flag.
    #[must_use]
    pub fn with_nan_checks(mut self, enabled: bool) -> Self {
        self.nan_checks = enabled;
        self
    }

    /// The configuration currently in effect.
    #[must_use]
    pub fn current() -> Self {
        Self {
            nan_checks: nan_checks_enabled(),
        }
    }

    /// Make this configuration the process-wide one.
    pub fn install(self) {
        NAN_CHECKS.store(self.nan_checks, Ordering::Relaxed);
        info!(nan_checks = self.nan_checks, "math config installed");
    }
}

impl Default for MathConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialises tests that install a process-wide config and restores the
/// previous one afterwards.
#[cfg(test)]
pub(crate) fn with_installed_nan_checks<R>(enabled: bool, f: impl FnOnce() -> R) -> R {
    use std::sync::Mutex;

    static LOCK: Mutex<()> = Mutex::new(());

    struct Restore(MathConfig);

    impl Drop for Restore {
        fn drop(&mut self) {
            self.0.install();
        }
    }

    let _lock = LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = Restore(MathConfig::current());
    MathConfig::new().with_nan_checks(enabled).install();
    f()
}

/// Parse a boolean-ish flag value. Unknown values yield `None`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
