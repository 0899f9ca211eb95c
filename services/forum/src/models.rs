//! Forum records and request payloads

pub mod message;
pub mod room;
pub mod topic;
pub mod user;

pub use message::{Message, MessageView, NewMessage};
pub use room::{NewRoom, Room, RoomQuery, RoomView, UpdateRoom};
pub use topic::Topic;
pub use user::{NewUser, NewUserRecord, UpdateUser, User};
