pub mod analysis;
pub mod api;
pub mod app;
pub mod config;
pub mod console;
pub mod error;
pub mod images;
pub mod ingredients;
pub mod meal_plan;
pub mod profile;
pub mod session;
pub mod state;

pub use error::{RemoteFailure, ValidationFailure};
pub use session::{Outcome, Session, SessionState, View, Workflow};
pub use state::AppState;
