//! Procmap - procedural map chunk streaming around a moving observer

pub mod core;
pub mod streaming;
pub mod terrain;
pub mod debug;
