// Library exports for the Forager Battlesnake
// This allows the replay tool and the integration tests to use the core decision logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod replay;
pub mod types;
