pub mod batch;
pub mod error;
pub mod index;
pub mod layout;
pub mod model;
pub mod probe;
pub mod runid;
