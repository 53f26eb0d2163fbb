//! Stable numeric identifier for the calling thread.
//!
//! On Linux this is the kernel thread id, which matches what `top -H`, `gdb`
//! and `/proc/<pid>/task` show. Elsewhere a process-unique counter is handed
//! out on first use. Either way the value is computed once per thread.

use std::cell::Cell;

thread_local! {
    static THREAD_ID: Cell<u64> = const { Cell::new(0) };
}

/// Returns the numeric identifier of the calling thread.
#[inline]
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|cached| {
        let id = cached.get();
        if id != 0 {
            return id;
        }
        let id = platform::thread_id();
        cached.set(id);
        id
    })
}

#[cfg(target_os = "linux")]
mod platform {
    pub(super) fn thread_id() -> u64 {
        // SAFETY: gettid takes no arguments, cannot fail and has no side effects.
        let tid = unsafe { libc::syscall(libc::SYS_gettid) };
        if tid > 0 {
            tid as u64
        } else {
            super::fallback::next_id()
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub(super) fn thread_id() -> u64 {
        super::fallback::next_id()
    }
}

mod fallback {
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_ID: AtomicU64 = AtomicU64::new(1);

    pub(super) fn next_id() -> u64 {
        NEXT_ID.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_is_stable() {
        let first = current_thread_id();
        assert_ne!(first, 0);
        assert_eq!(first, current_thread_id());
    }

    #[test]
    fn test_thread_ids_differ_across_threads() {
        let here = current_thread_id();
        let there = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
    }
}
