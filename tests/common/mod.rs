#![allow(dead_code, unused_imports)]

pub mod entities;
pub mod fake;

pub use entities::{Order, User};
pub use fake::{FakeDatabase, FakeTransaction, RecordingObserver};
pub use logs::LogCapture;
pub use repositories::{OrderRepository, RepoFuture, UserRepository};
