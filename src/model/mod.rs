pub mod config;
pub mod document;
pub mod task;
pub mod transaction;

pub use config::*;
pub use document::*;
pub use task::*;
pub use transaction::*;
