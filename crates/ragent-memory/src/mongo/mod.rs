mod checkpoint;
mod client;
mod long_term;
mod models;

pub use checkpoint::MongoCheckpointStore;
pub use client::connect;
pub use long_term::MongoLongTermStore;
