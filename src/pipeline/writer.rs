//! Chunk Writer
//!
//! Renders one annotated source file into a front-matter Markdown chunk.
//! The source root and output directory travel in an explicit context value
//! threaded through calls; there is no ambient global state.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Annotation, Result, SourceFile};

/// Path-segment keywords that map to a `pattern` front-matter tag.
const PATTERN_KEYWORDS: &[&str] = &[
    "singleton",
    "factory",
    "builder",
    "adapter",
    "observer",
    "decorator",
    "strategy",
    "command",
    "facade",
];

/// Explicit pipeline context: where sources are rooted and chunks land.
#[derive(Debug, Clone)]
pub struct ChunkContext {
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
}

impl ChunkContext {
    pub fn new<S: AsRef<Path>, O: AsRef<Path>>(source_root: S, output_dir: O) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Where the chunk for `source` will be written.
    pub fn chunk_path(&self, source: &SourceFile) -> PathBuf {
        self.output_dir.join(derive_chunk_name(&source.rel))
    }
}

/// Derived chunk file name: the relative source path with its extension
/// dropped, directory separators flattened to `_`, and `.md` appended.
/// A pure function of the relative path.
pub fn derive_chunk_name(rel: &Path) -> String {
    let stem = rel.with_extension("");
    let flat = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.md", flat)
}

/// First path segment matching the keyword vocabulary, capitalized.
pub fn infer_pattern(rel: &Path) -> Option<String> {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
        .find(|segment| PATTERN_KEYWORDS.contains(&segment.as_str()))
        .map(|segment| capitalize(&segment))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Write the chunk file, overwriting any previous version.
///
/// Body sections appear in fixed order: fenced code block, `## Summary`,
/// `## Docstrings`.
pub fn write_chunk(
    ctx: &ChunkContext,
    source: &SourceFile,
    code: &str,
    annotation: &Annotation,
) -> Result<PathBuf> {
    let name = derive_chunk_name(&source.rel);
    let out_path = ctx.output_dir.join(&name);

    let mut content = String::new();
    content.push_str("---\n");
    content.push_str(&format!("file: {}\n", source.rel_display()));
    content.push_str(&format!("chunk: {}\n", name));
    if let Some(pattern) = infer_pattern(&source.rel) {
        content.push_str(&format!("pattern: {}\n", pattern));
    }
    content.push_str("---\n\n");

    content.push_str(&format!("```python\n{}\n```\n\n", code.trim_end()));
    content.push_str(&format!("## Summary\n{}\n\n", annotation.summary));
    content.push_str("## Docstrings\n");
    for docstring in &annotation.docstrings {
        content.push_str(&format!("- {}\n", docstring));
    }

    fs::write(&out_path, content)?;
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn annotation() -> Annotation {
        Annotation {
            summary: "Demonstrates the command pattern.".into(),
            docstrings: vec!["Execute the command.".into(), "Undo the command.".into()],
        }
    }

    #[test]
    fn test_derive_chunk_name_flattens_directories() {
        assert_eq!(
            derive_chunk_name(Path::new("behavioral/command.py")),
            "behavioral_command.md"
        );
        assert_eq!(derive_chunk_name(Path::new("command.py")), "command.md");
        assert_eq!(
            derive_chunk_name(Path::new("a/b/c/deep.py")),
            "a_b_c_deep.md"
        );
    }

    #[test]
    fn test_infer_pattern_matches_directory_segments() {
        assert_eq!(
            infer_pattern(Path::new("factory/kitchen.py")),
            Some("Factory".to_string())
        );
        // the file name carries its extension, so it never matches
        assert_eq!(infer_pattern(Path::new("behavioral/command.py")), None);
        assert_eq!(infer_pattern(Path::new("misc/helpers.py")), None);
    }

    #[test]
    fn test_write_chunk_renders_sections_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = ChunkContext::new("patterns", dir.path());
        let source = SourceFile {
            path: PathBuf::from("patterns/behavioral/command.py"),
            rel: PathBuf::from("behavioral/command.py"),
        };

        let path = write_chunk(&ctx, &source, "def run():\n    pass", &annotation())
            .expect("write chunk");
        let text = std::fs::read_to_string(&path).expect("read back");

        assert!(text.starts_with(
            "---\nfile: behavioral/command.py\nchunk: behavioral_command.md\n---\n\n"
        ));
        let code_at = text.find("```python").expect("code block");
        let summary_at = text.find("## Summary").expect("summary");
        let docstrings_at = text.find("## Docstrings").expect("docstrings");
        assert!(code_at < summary_at && summary_at < docstrings_at);
        assert!(text.contains("- Execute the command.\n- Undo the command.\n"));
    }

    #[test]
    fn test_write_chunk_includes_pattern_tag_when_inferred() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = ChunkContext::new("patterns", dir.path());
        let source = SourceFile {
            path: PathBuf::from("patterns/facade/subsystem.py"),
            rel: PathBuf::from("facade/subsystem.py"),
        };

        let path = write_chunk(&ctx, &source, "class Facade:\n    pass", &annotation())
            .expect("write chunk");
        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(text.contains("pattern: Facade\n"));
    }

    #[test]
    fn test_write_chunk_overwrites_existing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = ChunkContext::new("patterns", dir.path());
        let source = SourceFile {
            path: PathBuf::from("patterns/a.py"),
            rel: PathBuf::from("a.py"),
        };
        std::fs::write(dir.path().join("a.md"), "stale").expect("seed");

        let path = write_chunk(&ctx, &source, "def f():\n    pass", &annotation())
            .expect("write chunk");
        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(!text.contains("stale"));
    }

    proptest! {
        #[test]
        fn prop_chunk_name_is_deterministic_and_flat(
            segments in prop::collection::vec("[a-z][a-z0-9]{0,8}", 1..5)
        ) {
            let rel: PathBuf = segments.iter().collect::<PathBuf>().with_extension("py");
            let first = derive_chunk_name(&rel);
            let second = derive_chunk_name(&rel);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.ends_with(".md"));
            prop_assert!(!first.contains('/'));
            prop_assert!(!first.contains('\\'));
        }
    }
}
