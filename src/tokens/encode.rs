//! Delta encoding for `textDocument/semanticTokens/full`.
//!
//! Every token becomes five integers: `delta_line`, `delta_start`, `length`,
//! `token_type` and `token_modifiers_bitset`. The start column is relative to
//! the previous token only when both sit on the same line; on a new line it is
//! absolute. The running state tracks absolute positions of emitted tokens.

use tower_lsp::lsp_types::{SemanticToken, SemanticTokens};

use super::Annotation;

/// Number of integers emitted per token.
pub const TOKEN_STRIDE: usize = 5;

/// Encodes `annotations` into the flat relative-position stream.
///
/// The input must already be sorted by `(line, start_char)`. Unsorted input is
/// not rejected; its deltas wrap around and are meaningless to clients.
pub fn encode(annotations: &[Annotation]) -> Vec<u32> {
    let mut data = Vec::with_capacity(annotations.len() * TOKEN_STRIDE);
    for token in delta_tokens(annotations) {
        data.extend_from_slice(&[
            token.delta_line,
            token.delta_start,
            token.length,
            token.token_type,
            token.token_modifiers_bitset,
        ]);
    }
    data
}

/// Same stream as [`encode`], shaped as the LSP response payload.
pub fn encode_semantic_tokens(annotations: &[Annotation]) -> SemanticTokens {
    SemanticTokens {
        result_id: None,
        data: delta_tokens(annotations).collect(),
    }
}

fn delta_tokens(annotations: &[Annotation]) -> impl Iterator<Item = SemanticToken> + '_ {
    let mut prev_line: u32 = 0;
    let mut prev_col: u32 = 0;

    annotations.iter().map(move |annotation| {
        let delta_line = annotation.line.wrapping_sub(prev_line);
        let delta_start = if delta_line == 0 {
            annotation.start_char.wrapping_sub(prev_col)
        } else {
            annotation.start_char
        };

        prev_line = annotation.line;
        prev_col = annotation.start_char;

        SemanticToken {
            delta_line,
            delta_start,
            length: annotation.length,
            token_type: annotation.category.as_index(),
            token_modifiers_bitset: annotation.modifiers.bits(),
        }
    })
}

/// A token with its relative position resolved back to absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedToken {
    pub line: u32,
    pub start_char: u32,
    pub length: u32,
    pub token_type: u32,
    pub modifier_mask: u32,
}

/// Reverses [`encode`]. A trailing group shorter than five integers is
/// ignored.
pub fn decode(data: &[u32]) -> Vec<DecodedToken> {
    let mut line = 0u32;
    let mut col = 0u32;
    data.chunks_exact(TOKEN_STRIDE)
        .map(|chunk| {
            line = line.wrapping_add(chunk[0]);
            if chunk[0] == 0 {
                col = col.wrapping_add(chunk[1]);
            } else {
                col = chunk[1];
            }
            DecodedToken {
                line,
                start_char: col,
                length: chunk[2],
                token_type: chunk[3],
                modifier_mask: chunk[4],
            }
        })
        .collect()
}
