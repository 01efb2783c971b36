use parking_lot::Mutex;
use rota_core::{Task, User};

#[derive(Default)]
struct StoreData {
    users: Vec<User>,
    tasks: Vec<Task>,
}

/// In-memory aggregate owning the live user and task collections.
///
/// All access goes through one mutex: `read` hands callers a point-in-time
/// copy taken under the lock, `write` hands them the live collections. One
/// engine operation is exactly one acquisition, so no caller ever observes
/// another operation's partial mutation.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a consistent snapshot of users and tasks.
    ///
    /// The copies are taken before `f` executes, so the closure can run
    /// caller logic without holding up concurrent writers longer than the
    /// clone itself. Do not block inside `f` expecting fresh data.
    pub fn read<R>(&self, f: impl FnOnce(&[User], &[Task]) -> R) -> R {
        let (users, tasks) = {
            let data = self.inner.lock();
            (data.users.clone(), data.tasks.clone())
        };
        f(&users, &tasks)
    }

    /// Run `f` with exclusive access to the live collections.
    ///
    /// Domain failures are signalled through the closure's return value,
    /// never by unwinding; the store has no failure mode of its own.
    pub fn write<R>(&self, f: impl FnOnce(&mut Vec<User>, &mut Vec<Task>) -> R) -> R {
        let mut data = self.inner.lock();
        let data = &mut *data;
        f(&mut data.users, &mut data.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_core::TaskState;
    use std::sync::Arc;

    #[test]
    fn read_on_empty_store() {
        let store = InMemoryStore::new();
        let (users, tasks) = store.read(|users, tasks| (users.len(), tasks.len()));
        assert_eq!(users, 0);
        assert_eq!(tasks, 0);
    }

    #[test]
    fn write_then_read_sees_data() {
        let store = InMemoryStore::new();
        store.write(|users, tasks| {
            users.push(User::new("Liam"));
            tasks.push(Task::new("Ride"));
        });

        store.read(|users, tasks| {
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].name, "Liam");
            assert_eq!(tasks.len(), 1);
            assert_eq!(tasks[0].state, TaskState::Waiting);
        });
    }

    #[test]
    fn read_gets_a_copy_not_the_live_collections() {
        let store = InMemoryStore::new();
        store.write(|users, _| users.push(User::new("Noah")));

        let snapshot = store.read(|users, _| users.to_vec());
        store.write(|users, _| users.clear());

        // The snapshot taken before the clear is unaffected.
        assert_eq!(snapshot.len(), 1);
        store.read(|users, _| assert!(users.is_empty()));
    }

    #[test]
    fn concurrent_writers_never_interleave() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store.write(|users, _| {
                        let len = users.len();
                        users.push(User::new("x"));
                        // Under exclusive access the length we read stays valid.
                        assert_eq!(users.len(), len + 1);
                    });
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        store.read(|users, _| assert_eq!(users.len(), 800));
    }
}
