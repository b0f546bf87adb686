pub mod contributor;
pub mod request;

pub use contributor::*;
pub use request::*;
