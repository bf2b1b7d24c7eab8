pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod view;

pub use catalog::Catalog;
pub use domain::cart::{Cart, CartLine, LineChange};
pub use domain::product::{Product, ProductId, ProductKind};
pub use errors::{ApplicationError, DomainError};
pub use pricing::{CartSnapshot, CartSummary};
pub use view::{DetailView, EventOutcome, PageRenderer, RenderError, Screen, Storefront, UiEvent};
