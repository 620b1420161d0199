// Utilities for the github module
pub mod repo;
pub mod response;
pub mod size;
