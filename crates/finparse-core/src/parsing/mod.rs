//! Pure heuristics over extracted text and cell grids.

pub mod metadata;
pub mod structure;
pub mod table;
