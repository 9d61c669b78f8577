mod handle;
mod resolve;
mod snapshot;

pub use handle::Engine;
pub use snapshot::Snapshot;
