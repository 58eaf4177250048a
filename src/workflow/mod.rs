pub mod controller;
pub mod view_state;

pub use controller::{Notification, ViewStateController};
pub use view_state::{ViewPhase, ViewState};
