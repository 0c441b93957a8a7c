pub mod captions;
pub mod error;
pub mod intake;
