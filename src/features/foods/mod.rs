//! Food catalog management.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/items` | List all food items (newest first) |
//! | POST | `/items` | Create a food item |
//! | GET | `/items/{id}` | Get a food item |
//! | PUT | `/items/{id}` | Replace a food item |
//! | DELETE | `/items/{id}` | Delete a food item (idempotent) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{FoodCatalog, FoodService};
