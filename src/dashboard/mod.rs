//! Dashboard session, selections and render model.

pub mod console;
pub mod session;
pub mod state;
pub mod view;

pub use console::Command;
pub use session::Dashboard;
pub use state::Event;
pub use view::{DashboardView, RoundPanel};
