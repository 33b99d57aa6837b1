pub mod scorer;
pub mod selector;

pub use scorer::{Scorer, ScoringOutcome};
pub use selector::{cutoff_count, select_top};
