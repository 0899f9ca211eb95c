//! Repositories for database operations

pub mod message;
pub mod room;
pub mod topic;
pub mod user;

pub use message::MessageRepository;
pub use room::RoomRepository;
pub use topic::TopicRepository;
pub use user::{PgUserStore, Saved, UserRepository, UserStore};
