//! Returns module: client management, entry recording and monthly reports

pub mod clients;
pub mod entries;
pub mod report;
pub mod workflow;

pub use clients::*;
pub use entries::*;
pub use report::*;
pub use workflow::*;
