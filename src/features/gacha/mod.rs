//! Random food picker.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/gacha` | Current state and display text |
//! | GET | `/api/gacha/categories` | Category selectors |
//! | GET | `/api/gacha/eligible` | Items a category would draw from |
//! | PUT | `/api/gacha/category` | Change the active category |
//! | POST | `/api/gacha/spin` | Start a reveal sequence |
//! | POST | `/api/gacha/cancel` | Cancel a running sequence |
//! | GET | `/api/gacha/stream` | SSE stream of sequence events |

pub mod dtos;
pub mod engine;
pub mod filter;
pub mod handlers;
pub mod routes;
pub mod services;

pub use engine::GachaEngine;
pub use services::GachaService;
