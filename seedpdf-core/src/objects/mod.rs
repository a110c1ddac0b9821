mod indirect;
mod primitive;

pub use indirect::{IndirectObject, ObjectBody};
pub use primitive::ObjectId;
