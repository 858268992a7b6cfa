// src/mc/mod.rs
pub mod confidence;
pub mod mc_engine;
pub mod payoffs;
pub mod stats;
