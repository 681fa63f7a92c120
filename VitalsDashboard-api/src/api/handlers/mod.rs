pub mod chart;
pub mod connection;
pub mod health;
pub mod patients;
pub mod session;
pub mod vitals;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use chart::get_chart;
pub use connection::{get_connection_status, retry_connection};
pub use health::health_check;
pub use patients::{get_patient, list_patients};
pub use session::{analyze_patient, ask_question, clear_messages, get_session, select_patient};
pub use vitals::{get_vitals, record_vitals};
