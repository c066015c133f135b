//! Ignore-pattern lists
//!
//! Parses gitignore-style exclusion lists into [`IgnorePattern`]s and
//! matches paths against them. Matching is delegated to the `ignore` crate's
//! gitignore matcher so semantics follow git exactly: the last matching
//! pattern wins, `!` re-includes, a trailing `/` restricts a pattern to
//! directories.
//!
//! Batch scoring uses these lists for `.atsignore` files and `--exclude`
//! patterns.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::errors::{AppError, AppResult};

/// One exclusion rule from an ignore file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnorePattern {
    /// Pattern text without the `!` prefix or trailing `/`
    pub text: String,
    /// Line started with `!` (re-include)
    pub negated: bool,
    /// Line ended with `/` (directories only)
    pub dir_only: bool,
    /// Pattern is relative to the ignore file's directory
    pub anchored: bool,
    /// 1-based source line
    pub line: usize,
}

/// A line that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternIssue {
    pub line: usize,
    pub pattern: String,
    pub reason: String,
}

impl std::fmt::Display for PatternIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: '{}': {}", self.line, self.pattern, self.reason)
    }
}

/// Ordered ignore patterns plus their compiled matcher
#[derive(Debug, Clone)]
pub struct IgnoreList {
    root: PathBuf,
    patterns: Vec<IgnorePattern>,
    matcher: Gitignore,
}

impl IgnoreList {
    /// List that ignores nothing
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            matcher: Gitignore::empty(),
            root,
            patterns: Vec::new(),
        }
    }

    /// Parse ignore-file contents; patterns are rooted at `root`
    ///
    /// Fails on the first line that does not compile.
    pub fn parse(root: impl Into<PathBuf>, contents: &str) -> AppResult<Self> {
        let root = root.into();
        let mut builder = GitignoreBuilder::new(&root);
        let mut patterns = Vec::new();

        for (idx, raw) in contents.lines().enumerate() {
            let line_no = idx + 1;
            match check_line(line_no, raw) {
                Ok(Some((pattern, trimmed))) => {
                    builder.add_line(None, &trimmed).map_err(|e| {
                        AppError::invalid_pattern(line_no, &trimmed, e.to_string())
                    })?;
                    patterns.push(pattern);
                }
                Ok(None) => {}
                Err(issue) => {
                    return Err(AppError::invalid_pattern(
                        issue.line,
                        &issue.pattern,
                        issue.reason,
                    ))
                }
            }
        }

        let matcher = builder
            .build()
            .map_err(|e| AppError::invalid_pattern(0, "<list>", e.to_string()))?;

        debug!(root = %root.display(), patterns = patterns.len(), "Ignore list parsed");

        Ok(Self {
            root,
            patterns,
            matcher,
        })
    }

    /// Read and parse an ignore file rooted at its parent directory
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(root, &contents)
    }

    /// Check every non-comment, non-blank line; reports all failures
    pub fn validate(contents: &str) -> Vec<PatternIssue> {
        contents
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| check_line(idx + 1, raw).err())
            .collect()
    }

    /// Whether `path` is excluded
    ///
    /// Relative paths are taken relative to the list's root. Paths below an
    /// excluded directory are excluded too. Absolute paths outside the root
    /// are never excluded.
    pub fn is_ignored(&self, path: impl AsRef<Path>, is_dir: bool) -> bool {
        let path = path.as_ref();
        let rel = if path.is_absolute() {
            match path.strip_prefix(&self.root) {
                Ok(rel) => rel,
                Err(_) => return false,
            }
        } else {
            path
        };
        if rel.as_os_str().is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(rel, is_dir)
            .is_ignore()
    }

    pub fn patterns(&self) -> &[IgnorePattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Interpret one line: `Ok(None)` for blanks/comments, the parsed pattern
/// and its trimmed source otherwise.
fn check_line(line_no: usize, raw: &str) -> Result<Option<(IgnorePattern, String)>, PatternIssue> {
    let trimmed = trim_trailing_unescaped(raw.trim_end_matches('\r'));
    if trimmed.trim().is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let issue = |reason: &str| PatternIssue {
        line: line_no,
        pattern: trimmed.clone(),
        reason: reason.to_string(),
    };

    let mut body = trimmed.as_str();
    let mut negated = false;
    if body.starts_with("\\!") || body.starts_with("\\#") {
        // escaped literal first character; keep it without the backslash
        body = &trimmed[1..];
    } else if let Some(rest) = body.strip_prefix('!') {
        negated = true;
        body = rest;
    }

    let dir_only = body.ends_with('/');
    let body = body.trim_end_matches('/');
    let anchored = body.contains('/');
    if body.trim_start_matches('/').is_empty() {
        return Err(issue("pattern is empty"));
    }

    // compile the single line to surface glob syntax errors
    let mut single = GitignoreBuilder::new("/");
    single
        .add_line(None, &trimmed)
        .map_err(|e| issue(&glob_error_reason(&e)))?;

    Ok(Some((
        IgnorePattern {
            text: body.to_string(),
            negated,
            dir_only,
            anchored,
            line: line_no,
        },
        trimmed,
    )))
}

/// Trailing whitespace is dropped unless escaped with a backslash
fn trim_trailing_unescaped(line: &str) -> String {
    let trimmed = line.trim_end();
    if trimmed.ends_with('\\') && trimmed.len() < line.len() {
        return format!("{} ", trimmed);
    }
    trimmed.to_string()
}

fn glob_error_reason(err: &ignore::Error) -> String {
    let msg = err.to_string();
    msg.rsplit(": ").next().unwrap_or(&msg).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# build output
target/
*.log
/dist
docs/**/*.tmp
.env*
!.env.example
";

    #[test]
    fn test_parse_flags() {
        let list = IgnoreList::parse("/repo", SAMPLE).unwrap();
        assert_eq!(list.len(), 6);

        let target = &list.patterns()[0];
        assert_eq!(target.text, "target");
        assert!(target.dir_only);
        assert!(!target.negated);
        assert!(!target.anchored);
        assert_eq!(target.line, 2);

        let dist = &list.patterns()[2];
        assert!(dist.anchored);
        assert!(!dist.dir_only);

        let keep = list.patterns().last().unwrap();
        assert!(keep.negated);
        assert_eq!(keep.text, ".env.example");
    }

    #[test]
    fn test_matching_and_negation() {
        let list = IgnoreList::parse("/repo", SAMPLE).unwrap();
        assert!(list.is_ignored("app.log", false));
        assert!(list.is_ignored("nested/deep/app.log", false));
        assert!(list.is_ignored(".env", false));
        assert!(list.is_ignored(".env.local", false));
        assert!(!list.is_ignored(".env.example", false));
        assert!(!list.is_ignored("src/main.rs", false));
    }

    #[test]
    fn test_dir_only_and_children() {
        let list = IgnoreList::parse("/repo", SAMPLE).unwrap();
        assert!(list.is_ignored("target", true));
        assert!(!list.is_ignored("target", false));
        assert!(list.is_ignored("target/debug/app", false));
    }

    #[test]
    fn test_anchored_pattern() {
        let list = IgnoreList::parse("/repo", SAMPLE).unwrap();
        assert!(list.is_ignored("dist", true));
        assert!(!list.is_ignored("web/dist", true));
    }

    #[test]
    fn test_absolute_paths() {
        let list = IgnoreList::parse("/repo", SAMPLE).unwrap();
        assert!(list.is_ignored("/repo/server.log", false));
        assert!(!list.is_ignored("/elsewhere/server.log", false));
    }

    #[test]
    fn test_escaped_literals() {
        let list = IgnoreList::parse("/repo", "\\#notes\n\\!important\n").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.patterns()[0].text, "#notes");
        assert_eq!(list.patterns()[1].text, "!important");
        assert!(!list.patterns()[1].negated);
    }

    #[test]
    fn test_empty_and_comment_only() {
        let list = IgnoreList::parse("/repo", "\n# nothing here\n   \n").unwrap();
        assert!(list.is_empty());
        assert!(!list.is_ignored("anything.txt", false));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = IgnoreList::parse("/repo", "*.log\nfoo[bar\n").unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::IgnoreInvalidPattern);
        assert!(err.message.contains("line 2"));
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let issues = IgnoreList::validate("ok.txt\n!\nbad[\n/\n# fine\n");
        let lines: Vec<usize> = issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_trailing_whitespace() {
        let list = IgnoreList::parse("/repo", "*.bak   \n").unwrap();
        assert_eq!(list.patterns()[0].text, "*.bak");
        assert!(list.is_ignored("old.bak", false));
    }
}
