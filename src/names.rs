//! Turns analyzer name occurrences into sorted [`Annotation`]s.
//!
//! The analyzer reports every definition and reference it finds, each with a
//! 1-based line, a 0-based column and a free-form kind string. Only kinds with
//! a [`Category`] counterpart survive; `statement` occurrences are classified
//! by the first type the analyzer infers for them.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::SemanticTokens;

pub use crate::tokens::PositionEncoding;
use crate::tokens::{self, Annotation, Category, Modifier, Modifiers};

const STATEMENT_KIND: &str = "statement";
const MODULE_KIND: &str = "module";

/// One name reported by the analyzer.
pub trait NameOccurrence {
    /// 1-based line, if known.
    fn line(&self) -> Option<u32>;

    /// 0-based column, if known.
    fn column(&self) -> Option<u32>;

    fn kind(&self) -> &str;

    fn is_definition(&self) -> bool;

    /// The name as written in the source.
    fn text(&self) -> &str;

    /// Kinds of the types inferred for this name, best candidate first.
    fn infer(&self) -> Vec<String>;
}

/// A name occurrence as it appears in serialized analyzer output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawName {
    pub name: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_definition: bool,
    #[serde(default)]
    pub inferred: Vec<String>,
}

impl RawName {
    pub fn new<S, K>(name: S, line: u32, column: u32, kind: K) -> Self
    where
        S: Into<String>,
        K: Into<String>,
    {
        RawName {
            name: name.into(),
            line: Some(line),
            column: Some(column),
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn definition(mut self) -> Self {
        self.is_definition = true;
        self
    }

    pub fn inferred_as<K: Into<String>>(mut self, kind: K) -> Self {
        self.inferred.push(kind.into());
        self
    }
}

impl NameOccurrence for RawName {
    fn line(&self) -> Option<u32> {
        self.line
    }

    fn column(&self) -> Option<u32> {
        self.column
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn is_definition(&self) -> bool {
        self.is_definition
    }

    fn text(&self) -> &str {
        &self.name
    }

    fn infer(&self) -> Vec<String> {
        self.inferred.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    pub encoding: PositionEncoding,
    /// Sort annotations by position before they reach the encoder.
    pub sort_positions: bool,
    /// Maximum number of `statement` inference steps per occurrence.
    pub inference_limit: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            encoding: PositionEncoding::default(),
            sort_positions: true,
            inference_limit: 4,
        }
    }
}

/// Resolves the category of `name`, following `statement` kinds through
/// inference at most `limit` times.
pub fn classify<N: NameOccurrence + ?Sized>(name: &N, limit: usize) -> Option<Category> {
    let mut kind = name.kind().to_string();
    let mut steps = 0;
    while kind == STATEMENT_KIND {
        if steps == limit {
            log::trace!(
                "inference limit reached for `{}` after {} steps",
                name.text(),
                steps
            );
            return None;
        }
        kind = name.infer().into_iter().next()?;
        steps += 1;
    }
    Category::from_kind(&kind)
}

fn modifiers_for<N: NameOccurrence + ?Sized>(name: &N) -> Modifiers {
    if name.is_definition() && name.kind() != MODULE_KIND {
        Modifiers::empty().with(Modifier::Declaration)
    } else {
        Modifiers::empty()
    }
}

/// Builds the annotation for a single occurrence, or `None` if it cannot be
/// highlighted.
pub fn annotate<N: NameOccurrence + ?Sized>(
    name: &N,
    options: &CollectOptions,
) -> Option<Annotation> {
    let (line, column) = match (name.line(), name.column()) {
        (Some(line), Some(column)) if line > 0 => (line - 1, column),
        _ => {
            log::trace!("skipping `{}`: no position", name.text());
            return None;
        }
    };

    let category = match classify(name, options.inference_limit) {
        Some(category) => category,
        None => {
            log::trace!("skipping `{}`: unmapped kind `{}`", name.text(), name.kind());
            return None;
        }
    };

    let length = options.encoding.measure(name.text());
    if length == 0 {
        log::trace!("skipping empty name at L{}:{}", line, column);
        return None;
    }

    Some(Annotation {
        line,
        start_char: column,
        length,
        category,
        modifiers: modifiers_for(name),
    })
}

/// Collects annotations for every highlightable occurrence in `names`.
pub fn collect<'a, N, I>(names: I, options: &CollectOptions) -> Vec<Annotation>
where
    N: NameOccurrence + 'a,
    I: IntoIterator<Item = &'a N>,
{
    let mut seen = 0usize;
    let mut annotations = Vec::new();
    for name in names {
        seen += 1;
        if let Some(annotation) = annotate(name, options) {
            annotations.push(annotation);
        }
    }

    if options.sort_positions {
        tokens::sort_annotations(&mut annotations);
    }

    log::debug!(
        "collected {} semantic tokens ({} names skipped)",
        annotations.len(),
        seen - annotations.len()
    );
    annotations
}

/// Produces the semantic tokens response for `names`.
pub fn semantic_tokens<'a, N, I>(names: I, options: &CollectOptions) -> SemanticTokens
where
    N: NameOccurrence + 'a,
    I: IntoIterator<Item = &'a N>,
{
    let annotations = collect(names, options);
    tokens::encode_semantic_tokens(&annotations)
}
