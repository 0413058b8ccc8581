pub mod core;
pub mod results;
pub mod rooms;
pub mod schedule;
