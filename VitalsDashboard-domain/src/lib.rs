// Vitals Dashboard Domain
// This crate contains the monitoring logic for the vitals dashboard

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and backend connectivity
pub mod health;

// Re-export the data layer configuration for convenience
pub use vitals_dashboard_data::config;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
