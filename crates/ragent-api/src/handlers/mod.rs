pub mod health;
pub mod runs;
pub mod stream;
pub mod threads;
