//! Input/output adapters, configuration and error handling

/// Command-line interface
pub mod cli;
/// Constants and validated runtime configuration
pub mod configuration;
/// Error types and context management
pub mod error;
/// PNG tile sheets in, PNG grids out
pub mod image;
/// Progress bar over collapsed cells
pub mod progress;
/// JSON snapshots of solver grids
pub mod saved_state;
