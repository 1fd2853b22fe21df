use std::fmt;

use serde::{Deserialize, Serialize};

use super::platform::Platform;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Cpp14,
    Java,
    Java8,
    Java15,
    Python,
    Python3,
    Pypy,
    Pypy3,
    Csharp,
    Javascript,
    Typescript,
    Ruby,
    Swift,
    Golang,
    Scala,
    Kotlin,
    Rust,
    Php,
    Racket,
    Erlang,
    Elixir,
    Perl,
    Haskell,
    Clojure,
    Objectivec,
}

/// Comment delimiters used to embed prose in a source file.
///
/// When `block_close` is empty the language has no usable block comment and
/// every header line is prefixed with `line` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentStyle {
    pub block_open: &'static str,
    pub block_close: &'static str,
    pub block_line: &'static str,
    pub line: &'static str,
    /// Block comments nest, so an opener in the prose needs a second closer.
    pub nests: bool,
}

impl CommentStyle {
    const fn block(
        block_open: &'static str,
        block_close: &'static str,
        block_line: &'static str,
        line: &'static str,
    ) -> Self {
        Self {
            block_open,
            block_close,
            block_line,
            line,
            nests: false,
        }
    }

    const fn nesting(self) -> Self {
        Self {
            nests: true,
            ..self
        }
    }

    const fn line_only(line: &'static str) -> Self {
        Self::block("", "", "", line)
    }

    pub fn has_block(&self) -> bool {
        !self.block_open.is_empty() && !self.block_close.is_empty()
    }
}

const C_FAMILY: CommentStyle = CommentStyle::block("/*", "*/", " * ", "// ");
const PYTHON_FAMILY: CommentStyle = CommentStyle::block("\"\"\"", "\"\"\"", "", "# ");

impl Language {
    pub const ALL: [Language; 27] = [
        Language::C,
        Language::Cpp,
        Language::Cpp14,
        Language::Java,
        Language::Java8,
        Language::Java15,
        Language::Python,
        Language::Python3,
        Language::Pypy,
        Language::Pypy3,
        Language::Csharp,
        Language::Javascript,
        Language::Typescript,
        Language::Ruby,
        Language::Swift,
        Language::Golang,
        Language::Scala,
        Language::Kotlin,
        Language::Rust,
        Language::Php,
        Language::Racket,
        Language::Erlang,
        Language::Elixir,
        Language::Perl,
        Language::Haskell,
        Language::Clojure,
        Language::Objectivec,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Cpp14 => "cpp14",
            Language::Java => "java",
            Language::Java8 => "java8",
            Language::Java15 => "java15",
            Language::Python => "python",
            Language::Python3 => "python3",
            Language::Pypy => "pypy",
            Language::Pypy3 => "pypy3",
            Language::Csharp => "csharp",
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Golang => "golang",
            Language::Scala => "scala",
            Language::Kotlin => "kotlin",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Racket => "racket",
            Language::Erlang => "erlang",
            Language::Elixir => "elixir",
            Language::Perl => "perl",
            Language::Haskell => "haskell",
            Language::Clojure => "clojure",
            Language::Objectivec => "objectivec",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Cpp14 => "C++14",
            Language::Java => "Java",
            Language::Java8 => "Java8",
            Language::Java15 => "Java15",
            Language::Python => "Python",
            Language::Python3 => "Python3",
            Language::Pypy => "Pypy",
            Language::Pypy3 => "Pypy3",
            Language::Csharp => "C#",
            Language::Javascript => "JavaScript",
            Language::Typescript => "TypeScript",
            Language::Ruby => "Ruby",
            Language::Swift => "Swift",
            Language::Golang => "Go",
            Language::Scala => "Scala",
            Language::Kotlin => "Kotlin",
            Language::Rust => "Rust",
            Language::Php => "PHP",
            Language::Racket => "Racket",
            Language::Erlang => "Erlang",
            Language::Elixir => "Elixir",
            Language::Perl => "Perl",
            Language::Haskell => "Haskell",
            Language::Clojure => "Clojure",
            Language::Objectivec => "ObjectiveC",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp | Language::Cpp14 => "cpp",
            Language::Java | Language::Java8 | Language::Java15 => "java",
            Language::Python | Language::Python3 | Language::Pypy | Language::Pypy3 => "py",
            Language::Csharp => "cs",
            Language::Javascript => "js",
            Language::Typescript => "ts",
            Language::Ruby => "rb",
            Language::Swift => "swift",
            Language::Golang => "go",
            Language::Scala => "scala",
            Language::Kotlin => "kt",
            Language::Rust => "rs",
            Language::Php => "php",
            Language::Racket => "rkt",
            Language::Erlang => "erl",
            Language::Elixir => "ex",
            Language::Perl => "pl",
            Language::Haskell => "hs",
            Language::Clojure => "clj",
            Language::Objectivec => "m",
        }
    }

    /// The identifier a platform uses for this language, if it offers it.
    pub fn platform_slug(&self, platform: Platform) -> Option<&'static str> {
        match platform {
            Platform::Leetcode => match self {
                Language::C
                | Language::Cpp
                | Language::Java
                | Language::Python
                | Language::Python3
                | Language::Csharp
                | Language::Javascript
                | Language::Typescript
                | Language::Ruby
                | Language::Swift
                | Language::Golang
                | Language::Scala
                | Language::Kotlin
                | Language::Rust
                | Language::Php
                | Language::Racket
                | Language::Erlang
                | Language::Elixir => Some(self.key()),
                _ => None,
            },
            Platform::Hackerrank => match self {
                Language::Golang => Some("go"),
                _ => Some(self.key()),
            },
        }
    }

    pub fn comment_style(&self) -> CommentStyle {
        match self {
            Language::C
            | Language::Objectivec
            | Language::Cpp
            | Language::Cpp14
            | Language::Java
            | Language::Java8
            | Language::Java15
            | Language::Csharp
            | Language::Javascript
            | Language::Typescript
            | Language::Swift
            | Language::Golang
            | Language::Scala
            | Language::Kotlin
            | Language::Php => C_FAMILY,
            Language::Python | Language::Python3 | Language::Pypy | Language::Pypy3 => {
                PYTHON_FAMILY
            }
            Language::Ruby => CommentStyle::block("=begin", "=end", "", "# "),
            Language::Racket => CommentStyle::block("#|", "|#", " ", "; ").nesting(),
            Language::Rust => CommentStyle::line_only("//! "),
            Language::Erlang => CommentStyle::line_only("% "),
            Language::Elixir | Language::Perl => CommentStyle::line_only("# "),
            Language::Haskell => CommentStyle::line_only("-- "),
            Language::Clojure => CommentStyle::line_only(";; "),
        }
    }

    /// Prefix for the submission region marker lines.
    ///
    /// Rust's header is an inner doc comment (`//! `); the markers must not
    /// end up in the crate docs, so they alone use a plain `// ` comment.
    pub fn region_prefix(&self) -> &'static str {
        match self {
            Language::Rust => "// ",
            _ => self.comment_style().line,
        }
    }

    pub fn from_key(key: &str) -> Result<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.key() == key)
            .ok_or_else(|| Error::UnknownLanguage {
                name: key.to_string(),
            })
    }

    pub fn from_extension(ext: &str) -> Result<Language> {
        let lang = match ext {
            "c" => Language::C,
            "cpp" | "cc" | "cxx" => Language::Cpp,
            "java" => Language::Java,
            "py" => Language::Python3,
            "cs" => Language::Csharp,
            "js" => Language::Javascript,
            "ts" => Language::Typescript,
            "rb" => Language::Ruby,
            "swift" => Language::Swift,
            "go" => Language::Golang,
            "scala" | "sc" => Language::Scala,
            "kt" | "kts" | "ktm" => Language::Kotlin,
            "rs" => Language::Rust,
            "php" => Language::Php,
            "rkt" => Language::Racket,
            "erl" => Language::Erlang,
            "ex" | "exs" => Language::Elixir,
            "pl" => Language::Perl,
            "hs" => Language::Haskell,
            "clj" => Language::Clojure,
            "m" => Language::Objectivec,
            _ => {
                return Err(Error::UnknownLanguage {
                    name: format!("extension .{}", ext),
                })
            }
        };
        Ok(lang)
    }

    pub fn from_platform_slug(platform: Platform, slug: &str) -> Result<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.platform_slug(platform) == Some(slug))
            .ok_or_else(|| Error::UnknownLanguage {
                name: format!("{} {}", platform, slug),
            })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
