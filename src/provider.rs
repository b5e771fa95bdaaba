pub mod blogger;
pub mod error;
pub mod model;
pub mod path;
pub mod transport;
