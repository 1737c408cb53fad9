//! Workload profiles for benchmarking the walkvec container.
//!
//! - [`filled`]: a container of `n` sequential values
//! - [`churn_script`]: deterministic insert/remove positions via seed
//! - [`run_churn`]: replay a script while holding a fixed set of cursors

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use walkvec::WalkVec;

/// A container holding `0..n`.
pub fn filled(n: u64) -> WalkVec<u64> {
    (0..n).collect()
}

/// One structural change in a churn workload.
#[derive(Clone, Copy, Debug)]
pub enum Churn {
    /// Insert at `index % (len + 1)`.
    Insert(usize),
    /// Remove at `index % len`, skipped when empty.
    Remove(usize),
}

/// Generate `steps` churn operations, evenly split between inserts and
/// removals, from `seed`.
pub fn churn_script(steps: usize, seed: u64) -> Vec<Churn> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..steps)
        .map(|_| {
            let raw = rng.next_u64();
            let index = (raw >> 1) as usize;
            if raw & 1 == 0 {
                Churn::Insert(index)
            } else {
                Churn::Remove(index)
            }
        })
        .collect()
}

/// Replay `script` on `vec` with `cursors` live cursors spread evenly
/// across it. Returns the final length.
pub fn run_churn(vec: &mut WalkVec<u64>, script: &[Churn], cursors: usize) -> usize {
    let len = vec.len();
    let held: Vec<_> = (0..cursors)
        .map(|i| vec.cursor_at(i * len / cursors.max(1)))
        .collect();

    for (step, op) in script.iter().enumerate() {
        match *op {
            Churn::Insert(index) => {
                let at = index % (vec.len() + 1);
                vec.insert(at, step as u64);
            }
            Churn::Remove(index) => {
                if !vec.is_empty() {
                    let at = index % vec.len();
                    vec.remove(at);
                }
            }
        }
    }

    for cursor in held {
        vec.release(cursor);
    }
    vec.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churn_script_is_deterministic() {
        let a = churn_script(64, 7);
        let b = churn_script(64, 7);
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
        let c = churn_script(64, 8);
        assert_ne!(format!("{a:?}"), format!("{c:?}"));
    }

    #[test]
    fn run_churn_releases_its_cursors() {
        let mut v = filled(100);
        let script = churn_script(200, 1);
        run_churn(&mut v, &script, 8);
        assert_eq!(v.live_cursors(), 0);
        assert_eq!(v.cursor_slots(), 0);
    }
}
