//! # Chicken Dodge
//!
//! Demo game for `dodge_engine`: dodge chickens, collect what they drop and
//! survive as long as possible. The game is entirely data driven; see
//! `assets/scene.ron` for how the components below are wired together.

pub mod components;
pub mod game;
