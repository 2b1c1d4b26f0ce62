pub mod analysis;
pub mod audit;
pub mod error;
pub mod feedback;
pub mod id;
pub mod store;
