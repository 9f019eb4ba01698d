mod state;
mod store;
pub mod rules;

pub use state::{EyesMood, ProgressState, SECRET_WINDOW};
pub use store::ProgressStore;
