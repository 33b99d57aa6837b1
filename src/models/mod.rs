pub mod card;

pub use card::{CardRecord, NoteId, RatingScale, ScoredCard, SelectionResult};
