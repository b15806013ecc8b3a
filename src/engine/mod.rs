pub mod models;
pub mod plugin;
pub mod simulator;
pub mod arena;
pub mod bot_strategy;
pub mod bot_profiles;
