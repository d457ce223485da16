//! Application state module

mod app_state;
mod forms;
mod pagination;
pub mod wizard;

pub use app_state::*;
pub use forms::*;
pub use pagination::*;
pub use wizard::EmergencyType;
