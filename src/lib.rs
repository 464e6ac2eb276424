// SPDX-License-Identifier: MIT

//! In-place parallel reduction by repeated halving.
//!
//! Each round pairs element `i` with its mirror `size - 1 - i`, stores the
//! pairwise sums in the lower half and shrinks the logical size to
//! `ceil(size / 2)`. Rounds are spread over a [`StandardPool`] with a
//! leapfrog index assignment and separated by a pool barrier.
//!
//! ```no_run
//! use halving_reduce::{RoundCoordinator, Sequence, StandardPool};
//!
//! let pool = StandardPool::new(4)?;
//! let sequence = Sequence::ascending(1000);
//! let reduction = RoundCoordinator::new(&pool, 5)?.reduce(&sequence)?;
//! assert_eq!(reduction.total, 500_500);
//! # Ok::<(), halving_reduce::ReduceError>(())
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod pools;
pub mod render;
pub mod sequence;
pub mod wave;

pub use config::ReduceConfig;
pub use coordinator::{Reduction, RoundCoordinator, RoundObserver, RoundReport};
pub use error::{PoolError, ReduceError, Result};
pub use pools::standardpool::{StandardPool, Task};
pub use sequence::Sequence;
pub use wave::{run_wave, WaveTask, WorkerAssignment};
