/// Free list of reusable scratch values.
///
/// Values are handed out by value, so a released value cannot be touched or
/// released again by the caller. Releasing more values than were handed out
/// is a logic error caught in debug builds.
pub struct ObjectPool<T: Resettable> {
    pool: Vec<T>,
    max_size: usize,
    outstanding: usize,
    factory: fn() -> T,
}

impl<T> ObjectPool<T>
where
    T: Resettable,
{
    // Create a new ObjectPool with a specified maximum size
    pub fn new(max_size: usize) -> Self
    where
        T: Default,
    {
        Self::with_factory(max_size, T::default)
    }

    pub fn with_factory(max_size: usize, factory: fn() -> T) -> Self {
        ObjectPool {
            pool: Vec::new(),
            max_size,
            outstanding: 0,
            factory,
        }
    }

    /// Pool holding `initial_size` freshly built values up front.
    pub fn prefilled(max_size: usize, initial_size: usize, factory: fn() -> T) -> Self {
        let mut pool = Self::with_factory(max_size, factory);
        let initial_size = initial_size.min(max_size);
        pool.pool.reserve(initial_size);
        for _ in 0..initial_size {
            pool.pool.push((pool.factory)());
        }
        pool
    }

    // Get an object from the pool if available, otherwise build a new one
    pub fn get(&mut self) -> T {
        self.outstanding += 1;
        match self.pool.pop() {
            Some(obj) => obj,
            None => (self.factory)(),
        }
    }

    // Return an object to the pool if the pool is not full, otherwise discard the object
    // Call the reset method before returning it
    pub fn release(&mut self, mut obj: T) {
        debug_assert!(
            self.outstanding > 0,
            "released more objects than were taken from the pool"
        );
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.pool.len() < self.max_size {
            obj.reset();
            self.pool.push(obj);
        }
    }

    pub fn available(&self) -> usize {
        self.pool.len()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    // Clear all objects from the pool
    pub fn clear(&mut self) {
        self.pool.clear();
    }
}

pub trait Resettable {
    fn reset(&mut self);
}

impl<T> Resettable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectPool, Resettable};

    #[derive(Default)]
    struct Scratch {
        values: Vec<u32>,
        resets: u32,
    }

    impl Resettable for Scratch {
        fn reset(&mut self) {
            self.values.clear();
            self.resets += 1;
        }
    }

    #[test]
    fn release_resets_and_recycles() {
        let mut pool = ObjectPool::<Scratch>::new(4);
        let mut scratch = pool.get();
        scratch.values.extend([1, 2, 3]);
        pool.release(scratch);
        assert_eq!(pool.available(), 1);

        let scratch = pool.get();
        assert!(scratch.values.is_empty());
        assert_eq!(scratch.resets, 1);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn full_pool_discards_released_values() {
        let mut pool = ObjectPool::<Vec<u8>>::new(1);
        let a = pool.get();
        let b = pool.get();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn live_values_are_distinct() {
        let mut pool = ObjectPool::<Vec<u32>>::prefilled(8, 2, Vec::new);
        assert_eq!(pool.available(), 2);

        let mut live: Vec<Vec<u32>> = (0..4).map(|_| pool.get()).collect();
        for (i, value) in live.iter_mut().enumerate() {
            value.push(i as u32);
        }
        for (i, value) in live.iter().enumerate() {
            assert_eq!(value.as_slice(), &[i as u32]);
        }
        assert_eq!(pool.outstanding(), 4);

        for value in live.drain(..) {
            pool.release(value);
        }
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.available(), 4);
        assert!(pool.get().is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "released more objects")]
    fn over_release_is_caught() {
        let mut pool = ObjectPool::<Vec<u8>>::new(4);
        pool.release(Vec::new());
    }
}
