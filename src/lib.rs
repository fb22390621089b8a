pub mod app;
pub mod command;
pub mod config;
pub mod input;
pub mod manager;
pub mod model;
pub mod utils;
pub mod view;
pub mod window;
