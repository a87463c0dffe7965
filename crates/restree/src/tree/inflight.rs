//! Single-flight coordination for concurrent mounts of the same path.
//!
//! The first caller for a path becomes the leader and performs the read.
//! Later callers wait until the leader's guard is dropped and then consult
//! the index again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fnv::FnvHashMap;
use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
pub(crate) struct InFlight {
    calls: Mutex<FnvHashMap<PathBuf, Arc<Call>>>,
}

/// Completion signal of one in-flight mount.
#[derive(Debug, Default)]
pub(crate) struct Call {
    done: Mutex<bool>,
    finished: Condvar,
}

impl Call {
    /// Blocks until the leader finishes, successfully or not.
    pub(crate) fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.finished.wait(&mut done);
        }
    }

    fn complete(&self) {
        *self.done.lock() = true;
        self.finished.notify_all();
    }
}

pub(crate) enum Flight<'a> {
    Leader(LeaderGuard<'a>),
    Follower(Arc<Call>),
}

/// Held by the leader for the duration of its mount.
///
/// Dropping it, including while unwinding, releases every waiter.
pub(crate) struct LeaderGuard<'a> {
    inflight: &'a InFlight,
    path: PathBuf,
    call: Arc<Call>,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        self.inflight.calls.lock().remove(&self.path);
        self.call.complete();
    }
}

impl InFlight {
    /// Joins the in-flight mount of `path`, or starts one.
    pub(crate) fn begin(&self, path: &Path) -> Flight<'_> {
        let mut calls = self.calls.lock();
        if let Some(call) = calls.get(path) {
            return Flight::Follower(Arc::clone(call));
        }

        let call = Arc::new(Call::default());
        calls.insert(path.to_path_buf(), Arc::clone(&call));
        Flight::Leader(LeaderGuard {
            inflight: self,
            path: path.to_path_buf(),
            call,
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn first_caller_leads_and_others_follow() {
        let inflight = InFlight::default();
        let path = Path::new("/src");

        let leader = inflight.begin(path);
        assert!(matches!(leader, Flight::Leader(_)));
        assert!(matches!(inflight.begin(path), Flight::Follower(_)));
        assert!(matches!(inflight.begin(Path::new("/other")), Flight::Leader(_)));

        drop(leader);
        assert_eq!(inflight.len(), 0);
        assert!(matches!(inflight.begin(path), Flight::Leader(_)));
    }

    #[test]
    fn followers_wake_when_leader_finishes() {
        let inflight = InFlight::default();
        let path = Path::new("/src");
        let leader = inflight.begin(path);
        let Flight::Follower(call) = inflight.begin(path) else {
            panic!("second caller should follow");
        };
        let finished = AtomicBool::new(false);

        thread::scope(|scope| {
            let waiter = scope.spawn(|| {
                call.wait();
                finished.load(Ordering::SeqCst)
            });

            thread::sleep(Duration::from_millis(20));
            finished.store(true, Ordering::SeqCst);
            drop(leader);

            assert!(waiter.join().unwrap());
        });
    }
}
