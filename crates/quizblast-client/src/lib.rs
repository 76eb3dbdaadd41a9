pub mod app;
pub mod error;
pub mod framebuffer;
pub mod hud;
pub mod questions;
pub mod renderer;
pub mod theme;
