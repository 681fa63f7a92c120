// Vitals Dashboard Data
// This crate handles configuration and access to the patient backend

// Environment-driven configuration
pub mod config;

// Repository implementations for data access
pub mod repository;

// Wire models exchanged with the backend
pub mod models;
