//! Download script templates and their renderer.
//!
//! Each archive ships one download script per platform. The scripts are
//! static text with `{{ name }}` placeholders, filled in by [`render`].
//! Rendering is plain substitution: no loops, no conditionals. A
//! placeholder naming a variable that is not supplied is an error, never an
//! empty string.
//!
//! Every value is substituted as a complete string literal of the target
//! language, so templates place placeholders bare (`URLS={{ urls_fname }}`)
//! and never inside quotes or comments.

mod checksum;

pub use checksum::ChecksumAlgorithm;

use std::fmt;

use crate::error::{BulkError, Result};

const SH_TEMPLATE: &str = include_str!("templates/download.sh.tpl");
const POWERSHELL_TEMPLATE: &str = include_str!("templates/download.ps1.tpl");
const PY_TEMPLATE: &str = include_str!("templates/download.py.tpl");

/// Supported download script flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// POSIX shell, needs `curl`.
    Shell,
    /// Windows PowerShell, no extra dependencies.
    PowerShell,
    /// Python 3, needs `requests`.
    Python,
}

impl ScriptKind {
    /// Every kind, in the order they are written into an archive.
    pub const ALL: [ScriptKind; 3] = [ScriptKind::Shell, ScriptKind::PowerShell, ScriptKind::Python];

    pub fn file_name(&self) -> &'static str {
        match self {
            ScriptKind::Shell => "download.sh",
            ScriptKind::PowerShell => "download.ps1",
            ScriptKind::Python => "download.py",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            ScriptKind::Shell => SH_TEMPLATE,
            ScriptKind::PowerShell => POWERSHELL_TEMPLATE,
            ScriptKind::Python => PY_TEMPLATE,
        }
    }

    /// Quote `value` as a string literal in this script's language.
    pub fn quote(&self, value: &str) -> Result<String> {
        match self {
            ScriptKind::Shell => Ok(format!("'{}'", value.replace('\'', "'\\''"))),
            ScriptKind::PowerShell => {
                // PowerShell also closes single-quoted strings on typographic quotes
                let mut out = String::with_capacity(value.len() + 2);
                out.push('\'');
                for c in value.chars() {
                    if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
                        out.push(c);
                    }
                    out.push(c);
                }
                out.push('\'');
                Ok(out)
            }
            // A JSON string is a valid Python 3 str literal
            ScriptKind::Python => Ok(serde_json::to_string(value)?),
        }
    }

    /// Render this kind's template.
    pub fn render(&self, vars: &ScriptVars<'_>) -> Result<String> {
        render(self.file_name(), self.template(), vars, |value| self.quote(value))
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Values available to script templates.
#[derive(Debug, Clone, Copy)]
pub struct ScriptVars<'a> {
    pub user_page: &'a str,
    /// Archive-relative path of the URL list, e.g. `tmp/abc_urls.txt`.
    pub urls_fname: &'a str,
    /// Archive-relative path of the checksum list.
    pub md5sum_fname: &'a str,
    pub prefix: &'a str,
    pub username: &'a str,
    pub checksum_algorithm: ChecksumAlgorithm,
}

impl<'a> ScriptVars<'a> {
    fn lookup(&self, name: &str) -> Option<&'a str> {
        match name {
            "user_page" => Some(self.user_page),
            "urls_fname" => Some(self.urls_fname),
            "md5sum_fname" => Some(self.md5sum_fname),
            "prefix" => Some(self.prefix),
            "username" => Some(self.username),
            "checksum_algorithm" => Some(self.checksum_algorithm.name()),
            _ => None,
        }
    }
}

/// Substitute every `{{ name }}` placeholder in `template`.
///
/// Each value passes through `quote` before insertion. `template_name` only
/// labels errors.
pub fn render(
    template_name: &str,
    template: &str,
    vars: &ScriptVars<'_>,
    quote: impl Fn(&str) -> Result<String>,
) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find("}}").ok_or_else(|| {
            let offset = template.len() - rest.len() + start;
            let line = template[..offset].matches('\n').count() + 1;
            BulkError::template(template_name, format!("unterminated placeholder on line {line}"))
        })?;

        let name = after[..end].trim();
        if name.is_empty() {
            return Err(BulkError::template(template_name, "empty placeholder"));
        }

        let value = vars.lookup(name).ok_or_else(|| {
            BulkError::template(template_name, format!("undefined variable `{name}`"))
        })?;
        out.push_str(&quote(value)?);

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> ScriptVars<'static> {
        ScriptVars {
            user_page: "https://data.example.org/user/alice",
            urls_fname: "tmp/abc_urls.txt",
            md5sum_fname: "tmp/abc_md5sum.txt",
            prefix: "abc",
            username: "alice",
            checksum_algorithm: ChecksumAlgorithm::Md5,
        }
    }

    fn verbatim(value: &str) -> Result<String> {
        Ok(value.to_string())
    }

    #[test]
    fn test_substitution() {
        let out = render("t", "get {{prefix}} from {{ urls_fname }}!", &vars(), verbatim).unwrap();
        assert_eq!(out, "get abc from tmp/abc_urls.txt!");
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(render("t", "plain { text }", &vars(), verbatim).unwrap(), "plain { text }");
    }

    #[test]
    fn test_undefined_variable() {
        let err = render("t", "{{ api_key }}", &vars(), verbatim).unwrap_err();
        match err {
            BulkError::Template { template, reason } => {
                assert_eq!(template, "t");
                assert!(reason.contains("api_key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = render("t", "line one\n{{ prefix", &vars(), verbatim).unwrap_err();
        assert!(matches!(err, BulkError::Template { ref reason, .. } if reason.contains("line 2")));
    }

    #[test]
    fn test_empty_placeholder() {
        assert!(render("t", "{{ }}", &vars(), verbatim).is_err());
    }

    #[test]
    fn test_builtin_templates_render() {
        for kind in ScriptKind::ALL {
            let out = kind.render(&vars()).unwrap();
            assert!(!out.contains("{{"), "{kind} left a placeholder");
            assert!(out.contains("tmp/abc_urls.txt"), "{kind}");
            assert!(out.contains("tmp/abc_md5sum.txt"), "{kind}");
            assert!(out.contains("https://data.example.org/user/alice"), "{kind}");
            assert!(out.contains("CKAN_API_KEY"), "{kind}");
        }
    }

    #[test]
    fn test_shell_quoting() {
        let shell = ScriptKind::Shell;
        assert_eq!(shell.quote("abc").unwrap(), "'abc'");
        assert_eq!(shell.quote("it's").unwrap(), "'it'\\''s'");
        assert_eq!(shell.quote("$(id) `id` \"x\"").unwrap(), "'$(id) `id` \"x\"'");
    }

    #[test]
    fn test_powershell_quoting() {
        let ps = ScriptKind::PowerShell;
        assert_eq!(ps.quote("it's").unwrap(), "'it''s'");
        assert_eq!(ps.quote("$env:PATH").unwrap(), "'$env:PATH'");
        assert_eq!(ps.quote("a\u{2019}b").unwrap(), "'a\u{2019}\u{2019}b'");
    }

    #[test]
    fn test_python_quoting() {
        let py = ScriptKind::Python;
        assert_eq!(py.quote("abc").unwrap(), "\"abc\"");
        assert_eq!(py.quote("a\"b\nc\\").unwrap(), "\"a\\\"b\\nc\\\\\"");
    }

    #[test]
    fn test_hostile_username_stays_inside_literal() {
        let mut vars = vars();
        vars.username = "eve\ntouch /tmp/owned; echo INJECTED";
        vars.user_page = "https://x/\"$(touch /tmp/owned)\"";

        let shell = ScriptKind::Shell.render(&vars).unwrap();
        assert!(shell.contains("USERNAME='eve\ntouch /tmp/owned; echo INJECTED'\n"));
        assert!(shell.contains("USER_PAGE='https://x/\"$(touch /tmp/owned)\"'\n"));

        let ps = ScriptKind::PowerShell.render(&vars).unwrap();
        assert!(ps.contains("$UserName = 'eve\ntouch /tmp/owned; echo INJECTED'\n"));

        let py = ScriptKind::Python.render(&vars).unwrap();
        assert!(py.contains("USERNAME = \"eve\\ntouch /tmp/owned; echo INJECTED\"\n"));
        assert!(!py.lines().any(|line| line.starts_with("touch")));
    }

    #[test]
    fn test_checksum_algorithm_variable() {
        let mut vars = vars();
        vars.checksum_algorithm = ChecksumAlgorithm::Sha1;

        assert!(ScriptKind::Shell.render(&vars).unwrap().contains("ALGORITHM='sha1'\n"));
        assert!(ScriptKind::PowerShell.render(&vars).unwrap().contains("$Algorithm = 'sha1'\n"));
        assert!(ScriptKind::Python.render(&vars).unwrap().contains("ALGORITHM = \"sha1\"\n"));
    }

    #[test]
    fn test_script_shebangs() {
        assert!(ScriptKind::Shell.render(&vars()).unwrap().starts_with("#!/bin/sh\n"));
        assert!(ScriptKind::Python.render(&vars()).unwrap().starts_with("#!/usr/bin/env python3\n"));
    }
}
