//! Environment configuration.

use runner_api::normalize_base_url;

pub const RUNNER_BASE_URL_ENV_VAR: &str = "RUNNER_BASE_URL";

/// Resolves the runner service base URL from the environment, falling back
/// to the transport default for unset or blank values.
pub fn base_url_from_env() -> String {
    let from_env = std::env::var(RUNNER_BASE_URL_ENV_VAR).ok();
    sanitize_base_url(from_env)
}

fn sanitize_base_url(raw: Option<String>) -> String {
    normalize_base_url(raw.as_deref().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    use runner_api::DEFAULT_RUNNER_BASE_URL;

    use super::{base_url_from_env, RUNNER_BASE_URL_ENV_VAR};

    struct EnvVarGuard {
        previous: Option<String>,
    }

    impl EnvVarGuard {
        fn set(value: Option<&str>) -> Self {
            let previous = std::env::var(RUNNER_BASE_URL_ENV_VAR).ok();
            match value {
                Some(value) => std::env::set_var(RUNNER_BASE_URL_ENV_VAR, value),
                None => std::env::remove_var(RUNNER_BASE_URL_ENV_VAR),
            }

            Self { previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(value) => std::env::set_var(RUNNER_BASE_URL_ENV_VAR, value),
                None => std::env::remove_var(RUNNER_BASE_URL_ENV_VAR),
            }
        }
    }

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn base_url_falls_back_to_default_when_unset_or_blank() {
        let _env_serialization = lock_unpoisoned(env_lock());

        {
            let _guard = EnvVarGuard::set(None);
            assert_eq!(base_url_from_env(), DEFAULT_RUNNER_BASE_URL);
        }

        {
            let _guard = EnvVarGuard::set(Some("   "));
            assert_eq!(base_url_from_env(), DEFAULT_RUNNER_BASE_URL);
        }
    }

    #[test]
    fn base_url_uses_normalized_override_when_set() {
        let _env_serialization = lock_unpoisoned(env_lock());
        let _guard = EnvVarGuard::set(Some("  https://runner.example.com/ "));

        assert_eq!(base_url_from_env(), "https://runner.example.com");
    }
}
