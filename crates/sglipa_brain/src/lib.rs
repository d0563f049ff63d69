pub mod brain;
pub mod chains;
pub mod generator;
pub mod learner;
pub mod matcher;
pub mod persistence;
pub mod policy;
pub mod replies;
pub mod store;
pub mod vocabulary;

pub use brain::Brain;
pub use chains::{Edges, TransitionTable};
pub use generator::{generate, weighted_choice};
pub use matcher::find_reply;
pub use persistence::SavePolicy;
pub use policy::ResponsePolicy;
pub use replies::ReplyMemory;
pub use store::{BrainError, BrainState, Snapshot};
pub use vocabulary::Vocabulary;
