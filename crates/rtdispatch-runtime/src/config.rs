//! Thread-pool configuration

use rtdispatch_core::constants::{DEFAULT_THREAD_NAME, MAX_WORKERS};
use rtdispatch_core::env::{env_get, env_get_bool, env_get_opt, env_get_str};
use rtdispatch_core::error::{DispatchError, DispatchResult};

/// Configuration for a `CallbackThreadPool`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads (fixed for the pool's lifetime)
    pub num_workers: usize,

    /// Use the real-time scheduling class for workers
    pub realtime: bool,

    /// Priority level, passed verbatim to the priority setter
    ///
    /// The normal class on Linux (`SCHED_OTHER`) only accepts 0; any other
    /// level there fails with `PriorityError::InvalidLevel`. Real-time levels
    /// are 1..=99, see `priority_range`.
    pub priority: i32,

    /// Fail pool construction if any worker cannot apply its priority
    ///
    /// When false, a refused priority is logged and the worker keeps its
    /// inherited scheduling.
    pub strict_priority: bool,

    /// Worker threads are named `<thread_name>-<index>`
    pub thread_name: String,

    /// Worker stack size in bytes (None = std default)
    pub stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let num_cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        Self {
            num_workers: num_cpus.min(MAX_WORKERS),
            realtime: false,
            priority: 0,
            strict_priority: false,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with environment variables
    ///
    /// - `RTD_WORKERS` - worker count
    /// - `RTD_REALTIME` - `1`/`true`/`yes`/`on` for real-time scheduling
    /// - `RTD_PRIORITY` - priority level
    /// - `RTD_STRICT_PRIORITY` - fail construction when a priority is refused
    /// - `RTD_THREAD_NAME` - worker thread name prefix
    /// - `RTD_STACK_SIZE` - worker stack size in bytes
    ///
    /// Unset or unparsable variables keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            num_workers: env_get("RTD_WORKERS", defaults.num_workers),
            realtime: env_get_bool("RTD_REALTIME", defaults.realtime),
            priority: env_get("RTD_PRIORITY", defaults.priority),
            strict_priority: env_get_bool("RTD_STRICT_PRIORITY", defaults.strict_priority),
            thread_name: env_get_str("RTD_THREAD_NAME", &defaults.thread_name),
            stack_size: env_get_opt("RTD_STACK_SIZE").or(defaults.stack_size),
        }
    }

    /// Set number of worker threads
    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    /// Enable or disable real-time scheduling
    pub fn realtime(mut self, enable: bool) -> Self {
        self.realtime = enable;
        self
    }

    /// Set the priority level
    pub fn priority(mut self, level: i32) -> Self {
        self.priority = level;
        self
    }

    /// Make a refused priority a construction error
    pub fn strict_priority(mut self, enable: bool) -> Self {
        self.strict_priority = enable;
        self
    }

    /// Set the worker thread name prefix
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set worker stack size
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> DispatchResult<()> {
        if self.num_workers == 0 {
            return Err(DispatchError::InvalidConfig("num_workers must be at least 1"));
        }
        if self.thread_name.contains('\0') {
            return Err(DispatchError::InvalidConfig("thread_name contains a NUL byte"));
        }
        if self.stack_size == Some(0) {
            return Err(DispatchError::InvalidConfig("stack_size must be non-zero"));
        }
        Ok(())
    }

    /// Name for worker `index`
    pub(crate) fn worker_name(&self, index: usize) -> String {
        format!("{}-{}", self.thread_name, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PoolConfig::default();
        assert!(config.num_workers >= 1);
        assert!(!config.realtime);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_builder() {
        let config = PoolConfig::new()
            .num_workers(3)
            .realtime(true)
            .priority(70)
            .strict_priority(true)
            .thread_name("audio-deferred")
            .stack_size(256 * 1024);
        assert_eq!(config.num_workers, 3);
        assert!(config.realtime);
        assert_eq!(config.priority, 70);
        assert!(config.strict_priority);
        assert_eq!(config.worker_name(2), "audio-deferred-2");
        assert_eq!(config.stack_size, Some(256 * 1024));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            PoolConfig::new().num_workers(0).validate(),
            Err(DispatchError::InvalidConfig(_))
        ));
        assert!(matches!(
            PoolConfig::new().thread_name("bad\0name").validate(),
            Err(DispatchError::InvalidConfig(_))
        ));
        assert!(matches!(
            PoolConfig::new().stack_size(0).validate(),
            Err(DispatchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_large_worker_counts_accepted() {
        assert_eq!(PoolConfig::new().num_workers(MAX_WORKERS + 1).validate(), Ok(()));
        assert_eq!(PoolConfig::new().num_workers(u16::MAX as usize).validate(), Ok(()));
        assert!(PoolConfig::default().num_workers <= MAX_WORKERS);
    }

    #[test]
    fn test_from_env_overlay() {
        // The only test in this crate touching RTD_* variables
        std::env::set_var("RTD_WORKERS", "3");
        std::env::set_var("RTD_REALTIME", "yes");
        std::env::set_var("RTD_PRIORITY", "42");
        std::env::set_var("RTD_STRICT_PRIORITY", "1");
        std::env::set_var("RTD_THREAD_NAME", "env-pool");
        std::env::set_var("RTD_STACK_SIZE", "not-a-size");

        let config = PoolConfig::from_env();

        std::env::remove_var("RTD_WORKERS");
        std::env::remove_var("RTD_REALTIME");
        std::env::remove_var("RTD_PRIORITY");
        std::env::remove_var("RTD_STRICT_PRIORITY");
        std::env::remove_var("RTD_THREAD_NAME");
        std::env::remove_var("RTD_STACK_SIZE");

        assert_eq!(config.num_workers, 3);
        assert!(config.realtime);
        assert_eq!(config.priority, 42);
        assert!(config.strict_priority);
        assert_eq!(config.thread_name, "env-pool");
        assert_eq!(config.stack_size, None);
    }
}
