pub mod billboard;
pub mod response;

pub use billboard::*;
pub use response::*;
