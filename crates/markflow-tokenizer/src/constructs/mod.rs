//! Constructs: the grammar, one module per kind of Markdown syntax.
//!
//! Each module exposes a [`Construct`](crate::construct::Construct)
//! constant. Constructs are registered under a hook in the
//! [`ConstructRegistry`](crate::construct::ConstructRegistry); the partial
//! ones (blank line, content, paragraph) are only reached directly from the
//! initializers.

pub mod attention;
pub mod blank_line;
pub mod character_escape;
pub mod content;
pub mod definition;
pub mod heading_atx;
pub mod label_end;
pub mod label_start_image;
pub mod label_start_link;
pub mod paragraph;
pub mod thematic_break;
