pub mod audit_logger;
pub mod feedback_recorder;
pub mod supervisor;
