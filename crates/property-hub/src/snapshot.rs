use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Canonical in-memory copy of a fetched collection.
///
/// Reads share one `Arc<Vec<T>>`; writers replace it wholesale after a successful re-fetch.
/// A failed load never clears the last-known-good copy. Re-fetches are serialized, so a load
/// that started earlier can never replace the result of one that started later.
#[derive(Debug)]
pub struct Snapshot<T> {
    current: RwLock<Option<Arc<Vec<T>>>>,
    refreshing: Mutex<()>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            current: RwLock::new(None),
            refreshing: Mutex::new(()),
        }
    }
}

impl<T> Snapshot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached collection, loading it first when nothing is cached.
    pub fn get_or_load<E, F>(&self, load: F) -> Result<Arc<Vec<T>>, E>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
    {
        if let Some(records) = self.current() {
            return Ok(records);
        }
        self.refresh(load)
    }

    /// Re-fetches the collection and swaps it in. On error the previous copy stays in place.
    pub fn refresh<E, F>(&self, load: F) -> Result<Arc<Vec<T>>, E>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
    {
        let _refreshing = self.refreshing.lock().unwrap_or_else(PoisonError::into_inner);
        let records = Arc::new(load()?);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(records.clone());
        Ok(records)
    }

    pub fn invalidate(&self) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    pub fn current(&self) -> Option<Arc<Vec<T>>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn get_or_load_only_loads_once() {
        let snapshot = Snapshot::new();
        let first = snapshot
            .get_or_load(|| Ok::<_, ()>(vec![1, 2, 3]))
            .expect("initial load");
        let second = snapshot
            .get_or_load(|| Ok::<_, ()>(vec![9]))
            .expect("cached copy");

        assert_eq!(*first, vec![1, 2, 3]);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_refresh_keeps_last_known_good() {
        let snapshot = Snapshot::new();
        snapshot
            .refresh(|| Ok::<_, &str>(vec!["a", "b"]))
            .expect("initial load");

        let result = snapshot.refresh(|| Err("offline"));

        assert_eq!(result.unwrap_err(), "offline");
        assert_eq!(*snapshot.current().expect("still cached"), vec!["a", "b"]);
    }

    #[test]
    fn invalidate_forces_reload() {
        let snapshot = Snapshot::new();
        snapshot
            .refresh(|| Ok::<_, ()>(vec![1]))
            .expect("initial load");
        snapshot.invalidate();

        assert!(snapshot.current().is_none());
        let reloaded = snapshot
            .get_or_load(|| Ok::<_, ()>(vec![2]))
            .expect("reload");
        assert_eq!(*reloaded, vec![2]);
    }

    #[test]
    fn overlapping_refreshes_keep_the_later_load() {
        let source = Arc::new(Mutex::new(vec!["a"]));
        let snapshot = Arc::new(Snapshot::new());

        let slow = {
            let source = source.clone();
            let snapshot = snapshot.clone();
            thread::spawn(move || {
                snapshot.refresh(|| {
                    let seen = source.lock().expect("source").clone();
                    thread::sleep(Duration::from_millis(300));
                    Ok::<_, ()>(seen)
                })
            })
        };

        thread::sleep(Duration::from_millis(50));
        source.lock().expect("source").push("b");
        snapshot
            .refresh(|| Ok::<_, ()>(source.lock().expect("source").clone()))
            .expect("second refresh");
        slow.join().expect("slow refresh thread").expect("first refresh");

        assert_eq!(*snapshot.current().expect("cached"), vec!["a", "b"]);
    }
}
