//! Turning a host tilemap into fingerprinted tiles and unique patterns

/// Host region abstraction and the tile grid reader
pub mod input;
/// Pattern extraction and deduplication
pub mod patterns;
/// Edge fingerprints and compatibility
pub mod signature;
