pub mod controller;
pub mod render;
pub mod states;

pub use controller::Storefront;
pub use render::{PageRenderer, RenderError};
pub use states::{DetailView, EventOutcome, Screen, UiEvent};
