use tower_lsp::lsp_types::{SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

use super::{Category, Modifier};

lazy_static! {
    /// Category names indexed by wire value.
    pub static ref TOKEN_TYPES: Vec<&'static str> =
        Category::ALL.iter().map(|c| c.name()).collect();

    /// Modifier names indexed by bit position.
    pub static ref TOKEN_MODIFIERS: Vec<&'static str> =
        Modifier::ALL.iter().map(|m| m.name()).collect();
}

/// Semantic token legend advertised to clients.
pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_TYPES
            .iter()
            .map(|name| SemanticTokenType::new(*name))
            .collect(),
        token_modifiers: TOKEN_MODIFIERS
            .iter()
            .map(|name| SemanticTokenModifier::new(*name))
            .collect(),
    }
}
