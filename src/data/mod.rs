//! Data layer: the in-memory table and the file readers that fill it.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (text-only columns dropped)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  column name → Vec<f64>, equal lengths, row order kept
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
