pub mod config;
pub mod logging;

pub mod extract;
pub mod probe;
pub mod resolver;
pub mod select;
pub mod track;

pub use resolver::{ResolveError, ResolvedStream, StreamResolver};
pub use track::TrackId;
