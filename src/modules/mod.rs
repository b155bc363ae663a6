//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the backends that hold the food collection.

pub mod food_store;
