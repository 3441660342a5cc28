//! Kalosdex: a terminal companion for Pokémon Legends: Z-A.
//!
//! State lives in [`state::AppState`] and changes only through [`reducer::reducer`];
//! network and disk work is described by [`effect::Effect`] and carried out by
//! the binary's effect handler.

pub mod action;
pub mod api;
pub mod collections;
pub mod config;
pub mod detail;
pub mod effect;
pub mod error;
pub mod guidance;
pub mod journal;
pub mod logging;
pub mod megas;
pub mod navigator;
pub mod persist;
pub mod reducer;
pub mod state;
pub mod team;
pub mod ui;
pub mod zones;
