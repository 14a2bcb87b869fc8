pub mod actions;
pub mod app;
pub mod config;
pub mod error;
pub mod persistence;
pub mod reducer;
pub mod share;
pub mod state;
pub mod validation;
pub mod views;

pub use actions::*;
pub use app::App;
pub use error::*;
pub use persistence::*;
pub use reducer::*;
pub use state::*;
