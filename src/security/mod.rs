pub mod roles;
pub mod voter;
