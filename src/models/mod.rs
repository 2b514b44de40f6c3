pub mod attendance;
pub mod center;
pub mod classroom;
pub mod filter;
pub mod material;
pub mod menu;
pub mod message;
pub mod permission;
pub mod student;
