//! Process-environment fixture for configuration tests.

use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Every variable `AppConfig::from_env` reads.
pub const CONFIG_VARS: [&str; 15] = [
    "APP_ENV",
    "HOST",
    "PORT",
    "STORAGE_MODE",
    "LOG_FORMAT",
    "DATABASE_URL",
    "DATABASE_URL_TEST",
    "DB_USER",
    "DB_PASSWORD",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "DB_NAME_TEST",
    "DB_POOL_SIZE",
    "DB_LOGGING",
];

static CONFIG_ENV_LOCK: Mutex<()> = Mutex::new(());

/// Configuration environment pinned for the lifetime of the value.
///
/// Creating one sets [`CONFIG_VARS`] to exactly the given overrides while
/// holding a process-wide lock. Dropping it restores the saved values.
pub struct ConfigEnv {
    saved: HashMap<&'static str, Option<OsString>>,
    _lock: MutexGuard<'static, ()>,
}

impl ConfigEnv {
    /// Pins the environment to exactly `overrides`.
    ///
    /// # Panics
    ///
    /// Panics when an override names a variable outside [`CONFIG_VARS`].
    pub fn with(overrides: &[(&str, &str)]) -> Self {
        let lock = CONFIG_ENV_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        for (name, _) in overrides {
            assert!(
                CONFIG_VARS.iter().any(|known| known == name),
                "{name} is not a configuration variable"
            );
        }

        let saved = CONFIG_VARS
            .iter()
            .map(|&name| (name, env::var_os(name)))
            .collect();
        for name in CONFIG_VARS {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value);
            // SAFETY: CONFIG_ENV_LOCK serializes every environment write in
            // this test binary.
            unsafe {
                match value {
                    Some(value) => env::set_var(name, value),
                    None => env::remove_var(name),
                }
            }
        }

        Self { saved, _lock: lock }
    }

    /// Pins an environment where no configuration variable is set.
    pub fn cleared() -> Self {
        Self::with(&[])
    }
}

impl Drop for ConfigEnv {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain() {
            // SAFETY: the lock is still held until this value is dropped.
            unsafe {
                match value {
                    Some(value) => env::set_var(name, value),
                    None => env::remove_var(name),
                }
            }
        }
    }
}
