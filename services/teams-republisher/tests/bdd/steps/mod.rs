//! BDD step definitions for the Teams republisher

pub mod delivery_steps;
pub mod message_steps;
