pub mod capabilities;
pub mod health;
pub mod notes;
pub mod sync;
pub mod version;
