use itertools::Itertools;
use tower_lsp::lsp_types::SemanticTokensLegend;

use super::{
    encode::{decode, DecodedToken},
    PositionEncoding,
};

/// Renders an encoded stream as one line per token, resolving type and
/// modifier indices through `legend`. When `source` is given the covered text
/// is appended, with columns and lengths counted in `encoding`.
pub fn dump(
    data: &[u32],
    source: Option<&str>,
    encoding: PositionEncoding,
    legend: &SemanticTokensLegend,
) -> String {
    let lines: Vec<&str> = source.map(|s| s.lines().collect()).unwrap_or_default();
    decode(data)
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let mut line = format!(
                "#{:03} L{}:{} len={} {}",
                i + 1,
                token.line,
                token.start_char,
                token.length,
                type_name(token, legend),
            );
            let modifiers = modifier_names(token.modifier_mask, legend);
            if !modifiers.is_empty() {
                line.push_str(&format!(" [{}]", modifiers.join(",")));
            }
            if let Some(text) = covered_text(&lines, token, encoding) {
                line.push_str(&format!(" {:?}", text));
            }
            line
        })
        .join("\n")
}

fn type_name(token: &DecodedToken, legend: &SemanticTokensLegend) -> String {
    legend
        .token_types
        .get(token.token_type as usize)
        .map(|t| t.as_str().to_string())
        .unwrap_or_else(|| format!("<type {}>", token.token_type))
}

fn modifier_names(mask: u32, legend: &SemanticTokensLegend) -> Vec<String> {
    (0..u32::BITS)
        .filter(|bit| mask & (1 << *bit) != 0)
        .map(|bit| {
            legend
                .token_modifiers
                .get(bit as usize)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| format!("<bit {}>", bit))
        })
        .collect()
}

fn covered_text(
    lines: &[&str],
    token: &DecodedToken,
    encoding: PositionEncoding,
) -> Option<String> {
    let line = lines.get(token.line as usize)?;
    let text = encoding.slice(line, token.start_char, token.length)?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{encode, legend, Annotation, Category, Modifier};

    const ASTRAL_SOURCE: &str = "s = \"𝛼\" + name\n";

    #[test]
    fn dump_lists_tokens_with_names_and_text() {
        let source = "import os\n\ndef main(x):\n    pass\n";
        let data = encode(&[
            Annotation::new(0, 0, 6, Category::Keyword),
            Annotation::new(0, 7, 2, Category::Module),
            Annotation::new(2, 4, 4, Category::Function).with_modifiers(&[Modifier::Declaration]),
            Annotation::new(2, 9, 1, Category::Parameter),
        ]);
        let out = dump(&data, Some(source), PositionEncoding::Utf32, &legend());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "#001 L0:0 len=6 keyword \"import\"");
        assert_eq!(lines[1], "#002 L0:7 len=2 module \"os\"");
        assert_eq!(lines[2], "#003 L2:4 len=4 function [declaration] \"main\"");
        assert_eq!(lines[3], "#004 L2:9 len=1 parameter \"x\"");
    }

    #[test]
    fn dump_without_source_and_unknown_indices() {
        let out = dump(&[1, 2, 3, 42, 0b10], None, Default::default(), &legend());
        assert_eq!(out, "#001 L1:2 len=3 <type 42> [<bit 1>]");
    }

    #[test]
    fn covered_text_follows_the_position_encoding() {
        let cases = [
            (PositionEncoding::Utf32, 10),
            (PositionEncoding::Utf16, 11),
            (PositionEncoding::Utf8, 13),
        ];
        for (encoding, column) in cases {
            let length = encoding.measure("name");
            let data = encode(&[Annotation::new(0, column, length, Category::Variable)]);
            let out = dump(&data, Some(ASTRAL_SOURCE), encoding, &legend());
            assert!(out.ends_with(" \"name\""), "{} listing was {:?}", encoding, out);
        }
    }

    #[test]
    fn split_characters_show_no_text() {
        let data = encode(&[Annotation::new(0, 5, 1, Category::Variable)]);
        let out = dump(&data, Some(ASTRAL_SOURCE), PositionEncoding::Utf16, &legend());
        assert_eq!(out, "#001 L0:5 len=1 variable");
    }
}
