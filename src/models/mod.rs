pub mod bucket;
pub mod report;
pub mod request;
pub mod transaction;

pub use bucket::*;
pub use report::*;
pub use request::*;
pub use transaction::*;
