//! Token model shared by the collector and the delta encoder.
//!
//! The integer value of every [`Category`] and [`Modifier`] is what travels
//! over the wire, so the declaration order below is load-bearing: clients
//! resolve indices through the legend built from the same order.

use std::{fmt, str::FromStr};

pub mod dump;
pub mod encode;
pub mod legend;

pub use dump::dump;
pub use encode::{decode, encode, encode_semantic_tokens, DecodedToken};
pub use legend::{legend, TOKEN_MODIFIERS, TOKEN_TYPES};

/// Highlighting class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Variable,
    Keyword,
    Module,
    Function,
    Class,
    Parameter,
}

impl Category {
    /// All categories in wire order.
    pub const ALL: [Category; 6] = [
        Category::Variable,
        Category::Keyword,
        Category::Module,
        Category::Function,
        Category::Class,
        Category::Parameter,
    ];

    pub fn as_index(self) -> u32 {
        match self {
            Category::Variable => 0,
            Category::Keyword => 1,
            Category::Module => 2,
            Category::Function => 3,
            Category::Class => 4,
            Category::Parameter => 5,
        }
    }

    pub fn from_index(index: u32) -> Option<Category> {
        Self::ALL.get(index as usize).copied()
    }

    /// Name advertised in the legend.
    pub fn name(self) -> &'static str {
        match self {
            Category::Variable => "variable",
            Category::Keyword => "keyword",
            Category::Module => "module",
            Category::Function => "function",
            Category::Class => "class",
            Category::Parameter => "parameter",
        }
    }

    /// Maps an analyzer kind string onto a category.
    ///
    /// The analyzer vocabulary is open-ended, so this is partial: anything
    /// without a direct counterpart (including `statement`, which needs
    /// inference first) yields `None`.
    pub fn from_kind(kind: &str) -> Option<Category> {
        match kind {
            "variable" => Some(Category::Variable),
            "keyword" => Some(Category::Keyword),
            "module" => Some(Category::Module),
            "function" => Some(Category::Function),
            "class" => Some(Category::Class),
            "param" => Some(Category::Parameter),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Binary attribute attached to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Declaration,
}

impl Modifier {
    pub const ALL: [Modifier; 1] = [Modifier::Declaration];

    pub fn as_index(self) -> u32 {
        match self {
            Modifier::Declaration => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Modifier::Declaration => "declaration",
        }
    }

    pub fn bit(self) -> Modifiers {
        Modifiers::from_bits_truncate(1 << self.as_index())
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

bitflags::bitflags! {
    /// Set of [`Modifier`]s, stored exactly as the wire bitmask.
    #[derive(Default)]
    pub struct Modifiers: u32 {
        const DECLARATION = 1 << 0;
    }
}

impl Modifiers {
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier.bit());
        self
    }

    pub fn has(self, modifier: Modifier) -> bool {
        self.contains(modifier.bit())
    }

    /// Members of the set in legend order.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.has(*m))
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Modifiers::empty(), |set, modifier| set.with(modifier))
    }
}

/// Code unit used to measure token lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionEncoding {
    Utf8,
    Utf16,
    Utf32,
}

impl PositionEncoding {
    pub fn measure(self, text: &str) -> u32 {
        let len = match self {
            PositionEncoding::Utf8 => text.len(),
            PositionEncoding::Utf16 => text.encode_utf16().count(),
            PositionEncoding::Utf32 => text.chars().count(),
        };
        len as u32
    }

    /// Extracts `length` units of `line` starting at `start`, counting in
    /// this encoding. Ranges that split a character come back as `None`.
    pub fn slice(self, line: &str, start: u32, length: u32) -> Option<String> {
        let (start, end) = (start as usize, start as usize + length as usize);
        match self {
            PositionEncoding::Utf8 => line.get(start..end).map(str::to_string),
            PositionEncoding::Utf16 => {
                let units: Vec<u16> = line.encode_utf16().collect();
                let units = units.get(start..end)?;
                String::from_utf16(units).ok()
            }
            PositionEncoding::Utf32 => {
                let text: String = line.chars().skip(start).take(end - start).collect();
                Some(text)
            }
        }
    }
}

impl Default for PositionEncoding {
    fn default() -> Self {
        PositionEncoding::Utf32
    }
}

impl FromStr for PositionEncoding {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "utf-8" => Ok(PositionEncoding::Utf8),
            "utf-16" => Ok(PositionEncoding::Utf16),
            "utf-32" => Ok(PositionEncoding::Utf32),
            other => Err(format!("unsupported position encoding `{}`", other)),
        }
    }
}

impl fmt::Display for PositionEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PositionEncoding::Utf8 => "utf-8",
            PositionEncoding::Utf16 => "utf-16",
            PositionEncoding::Utf32 => "utf-32",
        };
        write!(f, "{}", s)
    }
}

/// One token occurrence, positioned with zero-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub line: u32,
    pub start_char: u32,
    pub length: u32,
    pub category: Category,
    pub modifiers: Modifiers,
}

impl Annotation {
    pub fn new(line: u32, start_char: u32, length: u32, category: Category) -> Self {
        Self {
            line,
            start_char,
            length,
            category,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers |= modifiers.iter().copied().collect::<Modifiers>();
        self
    }

    pub fn position(&self) -> (u32, u32) {
        (self.line, self.start_char)
    }
}

/// Sorts annotations by `(line, start_char)`, keeping the relative order of
/// annotations that share a start position.
pub fn sort_annotations(annotations: &mut [Annotation]) {
    annotations.sort_by_key(Annotation::position);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_indices_follow_declaration_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.as_index(), i as u32);
            assert_eq!(Category::from_index(i as u32), Some(*category));
        }
        assert_eq!(Category::from_index(Category::ALL.len() as u32), None);
    }

    #[test]
    fn kind_mapping_is_exact_and_partial() {
        assert_eq!(Category::from_kind("class"), Some(Category::Class));
        assert_eq!(Category::from_kind("param"), Some(Category::Parameter));
        assert_eq!(Category::from_kind("parameter"), None);
        assert_eq!(Category::from_kind("Function"), None);
        assert_eq!(Category::from_kind("statement"), None);
        assert_eq!(Category::from_kind("unknown_type"), None);
    }

    #[test]
    fn duplicate_modifiers_collapse() {
        let annotation = Annotation::new(0, 0, 1, Category::Variable)
            .with_modifiers(&[Modifier::Declaration, Modifier::Declaration]);
        assert_eq!(annotation.modifiers.bits(), 1);
        assert_eq!(
            annotation.modifiers.iter().collect::<Vec<_>>(),
            vec![Modifier::Declaration]
        );
    }

    #[test]
    fn slice_counts_in_the_chosen_encoding() {
        let line = "x = \"𝛼β\" + y";
        assert_eq!(PositionEncoding::Utf32.slice(line, 9, 1), Some("+".to_string()));
        assert_eq!(PositionEncoding::Utf16.slice(line, 10, 1), Some("+".to_string()));
        assert_eq!(PositionEncoding::Utf8.slice(line, 13, 1), Some("+".to_string()));
        assert_eq!(PositionEncoding::Utf16.slice(line, 5, 3), Some("𝛼β".to_string()));
        assert_eq!(PositionEncoding::Utf16.slice(line, 5, 1), None);
        assert_eq!(PositionEncoding::Utf8.slice(line, 6, 1), None);
    }

    #[test]
    fn sort_is_stable_on_equal_positions() {
        let mut annotations = vec![
            Annotation::new(3, 1, 1, Category::Variable),
            Annotation::new(1, 4, 1, Category::Keyword),
            Annotation::new(1, 4, 2, Category::Function),
            Annotation::new(1, 0, 1, Category::Module),
        ];
        sort_annotations(&mut annotations);
        let order: Vec<_> = annotations.iter().map(|a| a.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Module,
                Category::Keyword,
                Category::Function,
                Category::Variable
            ]
        );
    }
}
