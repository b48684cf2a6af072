//! Platform-agnostic core: data model, payload normalization, chart series
//! derivation, persistence, and the upload client.

pub mod charts;
pub mod format;
pub mod normalize;
pub mod payload;
pub mod storage;
pub mod upload;
