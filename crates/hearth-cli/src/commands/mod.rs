pub mod chore;
pub mod common;
pub mod completions;
pub mod export;
pub mod household;
pub mod reward;
pub mod sync;
