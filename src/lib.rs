#[macro_use]
extern crate lazy_static;

pub mod cli;
pub mod errors;
pub mod logger;
pub mod names;
pub mod tokens;

pub use names::{
    collect, semantic_tokens, CollectOptions, NameOccurrence, PositionEncoding, RawName,
};
pub use tokens::{encode, legend, Annotation, Category, Modifier, Modifiers};
