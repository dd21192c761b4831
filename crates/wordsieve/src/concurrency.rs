//! # Data-Parallel Loop Helpers
//!
//! Every parallel region in this crate is a fork-join map whose workers write
//! to disjoint output slots; reduction into shared structures happens on the
//! calling thread, after the map returns.
//!
//! With the `rayon` feature these run on the global rayon pool;
//! without it, they run sequentially with identical results.

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::prelude::*;

        /// Map `f` over `0..len`, collecting results in index order.
        pub fn par_map_range<T, F>(
            len: usize,
            f: F,
        ) -> Vec<T>
        where
            T: Send,
            F: Fn(usize) -> T + Send + Sync,
        {
            (0..len).into_par_iter().map(f).collect()
        }

        /// Map `f` over a slice, collecting results in slice order.
        pub fn par_map_slice<I, T, F>(
            items: &[I],
            f: F,
        ) -> Vec<T>
        where
            I: Sync,
            T: Send,
            F: Fn(&I) -> T + Send + Sync,
        {
            items.par_iter().map(f).collect()
        }

        /// Fill each chunk of `data` (of length `chunk_len`) with `f(chunk_index, chunk)`.
        ///
        /// ## Panics
        /// Panics if `chunk_len` is zero.
        pub fn par_fill_chunks<T, F>(
            data: &mut [T],
            chunk_len: usize,
            f: F,
        ) where
            T: Send,
            F: Fn(usize, &mut [T]) + Send + Sync,
        {
            assert!(chunk_len > 0, "chunk_len must be positive");
            data.par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(idx, chunk)| f(idx, chunk));
        }

        /// Call `f(index, item)` on every item of a mutable slice.
        pub fn par_for_each_mut<T, F>(
            items: &mut [T],
            f: F,
        ) where
            T: Send,
            F: Fn(usize, &mut T) + Send + Sync,
        {
            items
                .par_iter_mut()
                .enumerate()
                .for_each(|(idx, item)| f(idx, item));
        }
    } else {
        /// Map `f` over `0..len`, collecting results in index order.
        pub fn par_map_range<T, F>(
            len: usize,
            f: F,
        ) -> Vec<T>
        where
            T: Send,
            F: Fn(usize) -> T + Send + Sync,
        {
            (0..len).map(f).collect()
        }

        /// Map `f` over a slice, collecting results in slice order.
        pub fn par_map_slice<I, T, F>(
            items: &[I],
            f: F,
        ) -> Vec<T>
        where
            I: Sync,
            T: Send,
            F: Fn(&I) -> T + Send + Sync,
        {
            items.iter().map(f).collect()
        }

        /// Fill each chunk of `data` (of length `chunk_len`) with `f(chunk_index, chunk)`.
        ///
        /// ## Panics
        /// Panics if `chunk_len` is zero.
        pub fn par_fill_chunks<T, F>(
            data: &mut [T],
            chunk_len: usize,
            f: F,
        ) where
            T: Send,
            F: Fn(usize, &mut [T]) + Send + Sync,
        {
            assert!(chunk_len > 0, "chunk_len must be positive");
            data.chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(idx, chunk)| f(idx, chunk));
        }

        /// Call `f(index, item)` on every item of a mutable slice.
        pub fn par_for_each_mut<T, F>(
            items: &mut [T],
            f: F,
        ) where
            T: Send,
            F: Fn(usize, &mut T) + Send + Sync,
        {
            items
                .iter_mut()
                .enumerate()
                .for_each(|(idx, item)| f(idx, item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_par_map_range_preserves_order() {
        let out = par_map_range(100, |i| i * 2);
        assert_eq!(out, (0..100).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_par_map_slice() {
        let items = vec!["a", "bb", "ccc"];
        assert_eq!(par_map_slice(&items, |s| s.len()), vec![1, 2, 3]);
    }

    #[test]
    fn test_par_fill_chunks() {
        let mut data = vec![0_usize; 12];
        par_fill_chunks(&mut data, 4, |row, chunk| {
            for (col, v) in chunk.iter_mut().enumerate() {
                *v = row * 10 + col;
            }
        });
        assert_eq!(data, vec![0, 1, 2, 3, 10, 11, 12, 13, 20, 21, 22, 23]);
    }

    #[test]
    fn test_par_for_each_mut() {
        let mut rows = vec![vec![0_usize; 2]; 3];
        par_for_each_mut(&mut rows, |idx, row| row.push(idx));
        assert_eq!(rows[2], vec![0, 0, 2]);
    }
}
