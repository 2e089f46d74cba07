pub mod callback;
pub mod capability;
