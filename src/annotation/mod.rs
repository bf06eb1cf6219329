pub mod builder;
pub mod io;

pub use builder::{Dataset, DatasetLoader};
pub use io::{ParseError, PointReader, PointRecord};
