// src/syntax/dialect.rs
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tree_sitter::Language;

/// Source dialect: annotated (TypeScript-like) or plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Typed,
    Untyped,
}

impl Dialect {
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "tsx" | "mts" | "cts" => Some(Self::Typed),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::Untyped),
            _ => None,
        }
    }

    /// Guesses the dialect from syntactic cues in the text.
    #[must_use]
    pub fn infer(source: &str) -> Self {
        if typed_cues().iter().any(|re| re.is_match(source)) {
            Self::Typed
        } else {
            Self::Untyped
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleMode {
    #[default]
    Module,
    Script,
}

/// Optional grammar extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarFeature {
    Jsx,
    Decorators,
}

/// Options for [`crate::syntax::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// `None` infers the dialect from the text.
    pub dialect: Option<Dialect>,
    pub module_mode: ModuleMode,
    pub features: BTreeSet<GrammarFeature>,
}

impl BuildOptions {
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn with_module_mode(mut self, mode: ModuleMode) -> Self {
        self.module_mode = mode;
        self
    }

    #[must_use]
    pub fn with_feature(mut self, feature: GrammarFeature) -> Self {
        self.features.insert(feature);
        self
    }

    #[must_use]
    pub fn has_feature(&self, feature: GrammarFeature) -> bool {
        self.features.contains(&feature)
    }

    /// Grammar used for parsing. JSX needs the TSX grammar; plain
    /// JavaScript parses with the TypeScript grammar.
    #[must_use]
    pub fn grammar(&self) -> Language {
        if self.has_feature(GrammarFeature::Jsx) {
            tree_sitter_typescript::language_tsx()
        } else {
            tree_sitter_typescript::language_typescript()
        }
    }
}

fn typed_cues() -> &'static [Regex] {
    static CUES: OnceLock<Vec<Regex>> = OnceLock::new();
    CUES.get_or_init(|| {
        [
            // parameter or binding annotated with a type
            r"[\w)\]]\s*\??:\s*(string|number|boolean|any|unknown|void|never|object|bigint|symbol)\b",
            r"\(\s*\w+\s*\??:\s*[A-Z]\w*",
            r"\)\s*:\s*(Promise<|[A-Z]\w*|string|number|boolean|void)",
            r"(?m)^\s*(export\s+)?(declare\s+)?interface\s+\w+",
            r"(?m)^\s*(export\s+)?type\s+\w+\s*(<[^>]*>)?\s*=",
            r"\bas\s+(const|string|number|any|unknown|[A-Z]\w*)\b",
            r"(?m)^\s*(public|private|protected|readonly)\s+\w+",
            r"\w+<[A-Z]\w*(\[\])?>\(",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}
