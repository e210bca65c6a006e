//! Code Extractor
//!
//! Isolates the top-level declarations of a Python source file. Imports,
//! module-level statements, and `if __name__ == "__main__"` entry points are
//! discarded; what remains is what the annotation service actually needs to
//! see.

use tree_sitter::Parser;

use crate::types::{ChunkError, Result};

/// Node kinds that survive extraction. Only direct children of the module
/// are considered, matching the "top-level declarations only" contract;
/// a tree-sitter query would also match nested definitions.
const DECLARATION_KINDS: &[&str] = &[
    "function_definition",
    "class_definition",
    "decorated_definition",
];

fn create_parser(path: &str) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ChunkError::parse(path, format!("failed to load Python grammar: {}", e)))?;
    Ok(parser)
}

/// Extract all top-level class/function definitions as one combined string,
/// in source order, separated by a blank line.
///
/// Returns an empty string when the file has no declarations; the caller
/// treats that as a no-op, not a failure. A file that does not parse yields
/// a recoverable `ChunkError::Parse`.
pub fn extract_declarations(path: &str, source: &str) -> Result<String> {
    let mut parser = create_parser(path)?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ChunkError::parse(path, "failed to parse Python source"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ChunkError::parse(path, "invalid Python syntax"));
    }

    let mut blocks = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if !DECLARATION_KINDS.contains(&child.kind()) {
            continue;
        }
        if let Some(text) = source.get(child.byte_range()) {
            let text = text.trim();
            if !text.is_empty() {
                blocks.push(text.to_string());
            }
        }
    }

    Ok(blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_top_level_declarations_only() {
        let source = r#"import abc
from typing import List

GLOBAL = 42

class Command:
    def execute(self):
        pass

def invoke(cmd):
    cmd.execute()

if __name__ == "__main__":
    invoke(Command())
"#;
        let code = extract_declarations("command.py", source).expect("extract");
        assert!(code.starts_with("class Command:"));
        assert!(code.contains("def invoke(cmd):"));
        assert!(!code.contains("import abc"));
        assert!(!code.contains("GLOBAL = 42"));
        assert!(!code.contains("__main__"));
    }

    #[test]
    fn test_declarations_are_blank_line_separated_in_order() {
        let source = "def first():\n    pass\n\ndef second():\n    pass\n";
        let code = extract_declarations("two.py", source).expect("extract");
        assert_eq!(code, "def first():\n    pass\n\ndef second():\n    pass");
    }

    #[test]
    fn test_decorated_and_async_definitions_are_kept() {
        let source = r#"@staticmethod
def decorated():
    pass

async def fetch():
    pass
"#;
        let code = extract_declarations("deco.py", source).expect("extract");
        assert!(code.contains("@staticmethod"));
        assert!(code.contains("async def fetch():"));
    }

    #[test]
    fn test_no_declarations_yields_empty_string() {
        let code = extract_declarations("flat.py", "x = 1\nprint(x)\n").expect("extract");
        assert!(code.is_empty());
    }

    #[test]
    fn test_invalid_syntax_is_a_parse_error() {
        let err = extract_declarations("bad.py", "def broken(:\n").unwrap_err();
        assert!(matches!(err, ChunkError::Parse { .. }));
        assert!(!err.is_attempt_failure());
    }
}
