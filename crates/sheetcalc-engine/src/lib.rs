//! sheetcalc_engine - Cell references, range resolution, and formula evaluation.

pub mod builtins;
pub mod engine;
