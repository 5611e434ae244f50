pub mod app;
pub mod collision;
pub mod config;
pub mod fruit;
pub mod grid;
pub mod input;
pub mod leaderboard;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
