pub mod errors;
pub mod manager;
pub mod organizer;
pub mod services;
pub mod view;

pub use errors::{OrganizerError, Result};
pub use manager::{Confirm, Mutation, RecordManager, Removal};
pub use organizer::Organizer;
