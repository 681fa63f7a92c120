// Public entities for the vitals dashboard API
// This module contains data structures that are shared across the application boundary

// Patients and their vitals rows
pub mod patient;

// Chart series
pub mod chart;

// Analysis session and chat log
pub mod session;

// Backend connection status
pub mod connection;

// Common entities for error handling
pub mod common;
