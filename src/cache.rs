// Memoized load result, owned by whoever drives reloads.
use crate::error::Result;
use once_cell::unsync::OnceCell;
use std::rc::Rc;
use tracing::debug;

type Hook = Box<dyn FnMut()>;

/// Holds one loaded value until `invalidate` is called. The value is shared
/// read-only; a refresh replaces it wholesale.
pub struct LoadCache<T> {
    cell: OnceCell<Rc<T>>,
    hooks: Vec<Hook>,
    loads: usize,
}

impl<T> Default for LoadCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoadCache<T> {
    pub fn new() -> Self {
        LoadCache {
            cell: OnceCell::new(),
            hooks: Vec::new(),
            loads: 0,
        }
    }

    /// Run `hook` every time the cache is invalidated.
    pub fn on_invalidate(&mut self, hook: impl FnMut() + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Cached value, or the result of `loader`. A failed load leaves the
    /// cache empty so the next call tries again.
    pub fn get_or_load<F>(&mut self, loader: F) -> Result<Rc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(v) = self.cell.get() {
            debug!("load cache hit");
            return Ok(Rc::clone(v));
        }
        let value = Rc::new(loader()?);
        self.loads += 1;
        let _ = self.cell.set(Rc::clone(&value));
        Ok(value)
    }

    pub fn get(&self) -> Option<Rc<T>> {
        self.cell.get().cloned()
    }

    pub fn invalidate(&mut self) {
        self.cell.take();
        for hook in self.hooks.iter_mut() {
            hook();
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Number of successful loads so far.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::cell::Cell;

    #[test]
    fn loads_once_until_invalidated() {
        let mut cache: LoadCache<Vec<u32>> = LoadCache::new();
        let calls = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let c = Rc::clone(&calls);
            let v = cache
                .get_or_load(|| {
                    c.set(c.get() + 1);
                    Ok(vec![1, 2, 3])
                })
                .unwrap();
            assert_eq!(v.len(), 3);
        }
        assert_eq!(calls.get(), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        let c = Rc::clone(&calls);
        cache
            .get_or_load(|| {
                c.set(c.get() + 1);
                Ok(vec![4])
            })
            .unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.loads(), 2);
        assert_eq!(cache.get().unwrap().as_slice(), &[4]);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache: LoadCache<u32> = LoadCache::new();
        let err = cache.get_or_load(|| Err(ReportError::Config("boom".into())));
        assert!(err.is_err());
        assert!(!cache.is_loaded());
        assert_eq!(*cache.get_or_load(|| Ok(7)).unwrap(), 7);
    }

    #[test]
    fn hooks_run_on_invalidate() {
        let mut cache: LoadCache<u32> = LoadCache::new();
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        cache.on_invalidate(move || f.set(f.get() + 1));
        cache.get_or_load(|| Ok(1)).unwrap();
        cache.invalidate();
        cache.invalidate();
        assert_eq!(fired.get(), 2);
    }
}
