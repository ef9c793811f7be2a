//! Data layer: table model, loading, filtering, aggregation and export.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv bytes
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse bytes → Table   (memoized by `cache`)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  schema   │  normalize labels, check required columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSelection → criteria → filtered Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  counts, top-K, cross tab, tags
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  filtered Table → CSV
//!   └──────────┘
//! ```
//! `pipeline` strings the middle steps together for one interaction.

pub mod aggregate;
pub mod cache;
pub mod detail;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod schema;
