//! Error types

mod dispatch;
mod resource;
mod view;

pub use dispatch::*;
pub use resource::*;
pub use view::*;
