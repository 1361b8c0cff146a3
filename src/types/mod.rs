//! Core types for jagbuf arrays

mod buffer;
mod dtype;
mod element;
mod form;
mod identities;

pub use buffer::{Backend, Buffer};
pub use dtype::DType;
pub use element::Element;
pub(crate) use element::CastTo;
pub use form::{Form, Parameters};
pub use identities::Identities;
