//! Thread scheduling priority
//!
//! Pool workers apply their priority on their own thread before they start
//! serving callbacks. The level is passed to the OS verbatim; its meaning
//! depends on the scheduling class:
//!
//! - real-time: `SCHED_FIFO` with `sched_priority = level`
//!   (1..=99 on Linux, usually requires `CAP_SYS_NICE` or an rtprio rlimit)
//! - normal: `SCHED_OTHER` with `sched_priority = level`
//!   (Linux only accepts 0; any other level is `PriorityError::InvalidLevel`
//!   and the thread keeps its current policy)

use rtdispatch_core::error::PriorityError;

/// Priority-setting facility for the calling thread
pub trait ThreadPriority: Send + Sync {
    /// Move the calling thread to the normal scheduling class
    ///
    /// On Linux only level 0 is valid for this class.
    fn set_normal(&self, level: i32) -> Result<(), PriorityError>;

    /// Move the calling thread to the real-time scheduling class
    fn set_realtime(&self, level: i32) -> Result<(), PriorityError>;

    /// Apply either class
    fn apply(&self, realtime: bool, level: i32) -> Result<(), PriorityError> {
        if realtime {
            self.set_realtime(level)
        } else {
            self.set_normal(level)
        }
    }
}

/// The operating system's scheduler
#[derive(Debug, Default, Clone, Copy)]
pub struct OsThreadPriority;

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use nix::errno::Errno;

        impl ThreadPriority for OsThreadPriority {
            fn set_normal(&self, level: i32) -> Result<(), PriorityError> {
                set_sched_policy(libc::SCHED_OTHER, level)
            }

            fn set_realtime(&self, level: i32) -> Result<(), PriorityError> {
                set_sched_policy(libc::SCHED_FIFO, level)
            }
        }

        fn set_sched_policy(policy: libc::c_int, level: i32) -> Result<(), PriorityError> {
            // sched_param carries private padding on some targets
            let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
            param.sched_priority = level;

            let thread = nix::sys::pthread::pthread_self();
            let ret = unsafe { libc::pthread_setschedparam(thread, policy, &param) };
            if ret == 0 {
                Ok(())
            } else {
                Err(errno_to_priority_error(Errno::from_raw(ret), level))
            }
        }

        /// Valid `sched_priority` range for a scheduling class
        pub fn priority_range(realtime: bool) -> Option<(i32, i32)> {
            let policy = if realtime { libc::SCHED_FIFO } else { libc::SCHED_OTHER };
            let (min, max) = unsafe {
                (libc::sched_get_priority_min(policy), libc::sched_get_priority_max(policy))
            };
            if min < 0 || max < 0 {
                None
            } else {
                Some((min, max))
            }
        }

        fn errno_to_priority_error(errno: Errno, level: i32) -> PriorityError {
            match errno {
                Errno::EPERM => PriorityError::PermissionDenied,
                Errno::EINVAL => PriorityError::InvalidLevel(level),
                Errno::ENOTSUP => PriorityError::Unsupported,
                other => PriorityError::Os(other as i32),
            }
        }
    } else {
        impl ThreadPriority for OsThreadPriority {
            fn set_normal(&self, _level: i32) -> Result<(), PriorityError> {
                Err(PriorityError::Unsupported)
            }

            fn set_realtime(&self, _level: i32) -> Result<(), PriorityError> {
                Err(PriorityError::Unsupported)
            }
        }

        /// Valid `sched_priority` range for a scheduling class
        pub fn priority_range(_realtime: bool) -> Option<(i32, i32)> {
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_errno_mapping() {
        assert_eq!(
            errno_to_priority_error(Errno::EPERM, 80),
            PriorityError::PermissionDenied
        );
        assert_eq!(
            errno_to_priority_error(Errno::EINVAL, 500),
            PriorityError::InvalidLevel(500)
        );
        assert_eq!(
            errno_to_priority_error(Errno::ESRCH, 1),
            PriorityError::Os(libc::ESRCH)
        );
    }

    #[test]
    fn test_realtime_range_is_sane() {
        if let Some((min, max)) = priority_range(true) {
            assert!(min <= max);
            assert!(min >= 0);
        }
    }

    #[test]
    fn test_normal_priority_zero() {
        // Fresh thread so the test runner's thread keeps its class
        let result = thread::spawn(|| OsThreadPriority.set_normal(0))
            .join()
            .unwrap();
        assert_eq!(result, Ok(()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_normal_priority_rejects_nonzero() {
        let result = thread::spawn(|| OsThreadPriority.set_normal(10))
            .join()
            .unwrap();
        assert_eq!(result, Err(PriorityError::InvalidLevel(10)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_realtime_priority_granted_or_denied() {
        // Unprivileged test environments are expected to refuse
        let result = thread::spawn(|| OsThreadPriority.apply(true, 1))
            .join()
            .unwrap();
        assert!(
            matches!(result, Ok(()) | Err(PriorityError::PermissionDenied)),
            "unexpected result {:?}",
            result
        );
    }
}
