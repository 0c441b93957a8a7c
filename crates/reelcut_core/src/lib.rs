pub mod editing;
pub mod error;
pub mod history;
pub mod selection;
pub mod snapping;
pub mod snapshot;
pub mod types;
