//! Pitch decks, promo graphics and images generated through a hosted Gemini model.
//!
//! The deck pipeline analyzes the input into a fixed twelve-slide outline
//! ([`analyzer`], [`outline`]) and then renders each slide in order under one style
//! ([`deck`], [`renderer`]). All model traffic goes through [`gateway::Gateway`].

pub mod analyzer;
pub mod config;
pub mod deck;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod history;
pub mod models;
pub mod optimizer;
pub mod outline;
pub mod pdf;
pub mod presets;
pub mod renderer;
pub mod routes;
pub mod service;

#[cfg(test)]
mod testing;
