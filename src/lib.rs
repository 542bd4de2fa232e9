pub mod app;
pub mod config;
pub mod index;
pub mod mail;
pub mod text;
pub mod ui;
