//! Headless workspace core (state/action/effect).

pub mod action;
pub mod effect;
pub mod panels;
pub mod playback;
pub mod projects;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use effect::Effect;
pub use panels::{PanelRef, PanelRemoval, PanelStatus, PanelsState, Succession};
pub use playback::{PlaybackFrame, PlaybackState, RenderedLine};
pub use projects::ProjectsState;
pub use state::{AppState, GatewayFailure, Page};
pub use store::{DispatchResult, Store};
