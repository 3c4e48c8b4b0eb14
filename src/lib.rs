//! Prop-shape inference and abstract-value binding for component props.
//!
//! `inference` merges observed reads and declared propTypes into a [`ir::Shape`];
//! `lower` renders a shape as an object literal; `bind` swaps the leaves of a
//! props literal for abstract placeholders named by their access path.
pub mod abstract_value;
pub mod ast;
pub mod bind;
pub mod cli;
pub mod facts;
pub mod inference;
pub mod ir;
pub mod logging;
pub mod lower;
pub mod path_de;

pub use bind::{BindError, BindSummary, bind_abstract_props};
pub use inference::{ShapeBuilder, ShapeError, build};
pub use ir::{Shape, ShapeValue, TypeTag};
pub use lower::{LowerError, lower_plain, lower_shape};
