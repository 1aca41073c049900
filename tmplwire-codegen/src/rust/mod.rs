//! Rust code generation modules.

pub mod blocks;
pub mod enums;
pub mod messages;

pub use blocks::BlockGenerator;
pub use enums::EnumGenerator;
pub use messages::MessageGenerator;
