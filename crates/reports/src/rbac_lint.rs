//! RBAC template lint
//!
//! Quét thư mục templates/static tìm chỗ UI tham chiếu tới khu vực được bảo vệ
//! mà không qua permission check:
//!
//! - `.html`: link/form/url_for tới route được bảo vệ trong file không hề gọi
//!   `has_permission(...)`; so sánh role cứng (`current_user.role == ...`)
//! - `.js`: `fetch`/XHR/axios tới endpoint được bảo vệ trong file không có
//!   permission gate
//! - `.css`: ẩn phần tử theo role (`.admin-only`, `[data-role]`) bằng
//!   `display: none` - chỉ là bảo vệ phía client

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::exporters::ReportData;

/// Route prefixes cần permission
pub const PROTECTED_PREFIXES: [&str; 7] = [
    "/compliance",
    "/sovereign",
    "/nvct-stablecoin",
    "/user-management",
    "/security-center",
    "/treasury",
    "/islamic-banking",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintRule {
    UnguardedLink,
    HardcodedRoleCheck,
    UnguardedApiCall,
    CssOnlyProtection,
}

impl LintRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintRule::UnguardedLink => "unguarded_link",
            LintRule::HardcodedRoleCheck => "hardcoded_role_check",
            LintRule::UnguardedApiCall => "unguarded_api_call",
            LintRule::CssOnlyProtection => "css_only_protection",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LintRule::UnguardedLink => "protected route linked without has_permission()",
            LintRule::HardcodedRoleCheck => "role compared directly instead of checking a permission",
            LintRule::UnguardedApiCall => "protected endpoint called without a permission gate",
            LintRule::CssOnlyProtection => "role-based content hidden with CSS only",
        }
    }
}

impl fmt::Display for LintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    Html,
    Js,
    Css,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" | "jinja" | "j2" => Some(SourceKind::Html),
            "js" | "mjs" => Some(SourceKind::Js),
            "css" => Some(SourceKind::Css),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub file: PathBuf,
    /// 1-based
    pub line: usize,
    pub rule: LintRule,
    pub snippet: String,
}

#[derive(Debug, Clone)]
pub struct LintReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub findings: Vec<LintFinding>,
    pub generated_at: DateTime<Utc>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn count(&self, rule: LintRule) -> usize {
        self.findings.iter().filter(|f| f.rule == rule).count()
    }
}

impl ReportData for LintReport {
    fn title(&self) -> &str {
        "RBAC Template Lint"
    }

    fn headers(&self) -> Vec<String> {
        ["File", "Line", "Rule", "Snippet"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.findings
            .iter()
            .map(|f| {
                let file = f.file.strip_prefix(&self.root).unwrap_or(&f.file);
                vec![
                    file.display().to_string(),
                    f.line.to_string(),
                    f.rule.as_str().to_string(),
                    f.snippet.clone(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut summary = vec![
            ("Root".to_string(), self.root.display().to_string()),
            ("Files Scanned".to_string(), self.files_scanned.to_string()),
            ("Findings".to_string(), self.findings.len().to_string()),
        ];
        for rule in [
            LintRule::UnguardedLink,
            LintRule::HardcodedRoleCheck,
            LintRule::UnguardedApiCall,
            LintRule::CssOnlyProtection,
        ] {
            let count = self.count(rule);
            if count > 0 {
                summary.push((rule.description().to_string(), count.to_string()));
            }
        }
        summary.push(("Generated At".to_string(), self.generated_at.to_rfc3339()));
        summary
    }
}

pub struct RbacLinter {
    html_link: Regex,
    html_url_for: Regex,
    html_guard: Regex,
    role_compare: Regex,
    js_call: Regex,
    js_guard: Regex,
    css_rule: Regex,
    css_role_selector: Regex,
    css_hidden: Regex,
}

impl RbacLinter {
    pub fn new() -> Result<Self> {
        Self::with_prefixes(&PROTECTED_PREFIXES)
    }

    pub fn with_prefixes(prefixes: &[&str]) -> Result<Self> {
        let paths = prefixes
            .iter()
            .map(|p| regex::escape(p.trim_end_matches('/')))
            .collect::<Vec<_>>()
            .join("|");
        // Blueprint names: "/nvct-stablecoin" -> "nvct_stablecoin"
        let blueprints = prefixes
            .iter()
            .map(|p| regex::escape(&p.trim_matches('/').replace('-', "_")))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            html_link: Regex::new(&format!(
                r#"(?i)(?:href|action|src|hx-get|hx-post)\s*=\s*["'](?:{paths})(?:[/?#"']|$)"#
            ))?,
            html_url_for: Regex::new(&format!(r#"url_for\(\s*["'](?:{blueprints})\."#))?,
            html_guard: Regex::new(r"has_permission\s*\(")?,
            role_compare: Regex::new(
                r#"(?:current_user|user)\.role\s*(?:==|!=|\bin\b)\s*[\[("']"#,
            )?,
            js_call: Regex::new(&format!(
                r#"(?:fetch\s*\(|\.open\s*\(\s*["'][A-Z]+["']\s*,|axios(?:\.\w+)?\s*\(|\$\.(?:ajax|get|post)\s*\()\s*[`"'](?:{paths})(?:[/?#`"']|$)"#
            ))?,
            js_guard: Regex::new(r"(?:hasPermission|has_permission|userPermissions|data-permission)")?,
            css_rule: Regex::new(r"([^{}]+)\{([^{}]*)\}")?,
            css_role_selector: Regex::new(
                r"(?i)\.(?:[a-z0-9_-]+-only|admin|staff|super-admin)\b|\[data-role",
            )?,
            css_hidden: Regex::new(r"(?i)display\s*:\s*none|visibility\s*:\s*hidden")?,
        })
    }

    /// Quét đệ quy một thư mục
    pub fn lint_dir(&self, root: &Path) -> Result<LintReport> {
        let mut files = Vec::new();
        collect_sources(root, &mut files)
            .with_context(|| format!("Failed to walk {}", root.display()))?;
        files.sort();

        let mut findings = Vec::new();
        for (path, kind) in &files {
            match std::fs::read_to_string(path) {
                Ok(content) => findings.extend(self.lint_source(path, *kind, &content)),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
            }
        }
        debug!(root = %root.display(), files = files.len(), findings = findings.len(), "rbac lint finished");

        Ok(LintReport {
            root: root.to_path_buf(),
            files_scanned: files.len(),
            findings,
            generated_at: Utc::now(),
        })
    }

    pub fn lint_source(&self, path: &Path, kind: SourceKind, content: &str) -> Vec<LintFinding> {
        match kind {
            SourceKind::Html => self.lint_html(path, content),
            SourceKind::Js => self.lint_js(path, content),
            SourceKind::Css => self.lint_css(path, content),
        }
    }

    fn lint_html(&self, path: &Path, content: &str) -> Vec<LintFinding> {
        let guarded = self.html_guard.is_match(content);
        let mut findings = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if !guarded && (self.html_link.is_match(line) || self.html_url_for.is_match(line)) {
                findings.push(finding(path, idx + 1, LintRule::UnguardedLink, line));
            }
            if self.role_compare.is_match(line) {
                findings.push(finding(path, idx + 1, LintRule::HardcodedRoleCheck, line));
            }
        }
        findings
    }

    fn lint_js(&self, path: &Path, content: &str) -> Vec<LintFinding> {
        if self.js_guard.is_match(content) {
            return Vec::new();
        }
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| self.js_call.is_match(line))
            .map(|(idx, line)| finding(path, idx + 1, LintRule::UnguardedApiCall, line))
            .collect()
    }

    fn lint_css(&self, path: &Path, content: &str) -> Vec<LintFinding> {
        self.css_rule
            .captures_iter(content)
            .filter_map(|caps| {
                let selector = caps.get(1)?;
                let body = caps.get(2)?.as_str();
                if !self.css_role_selector.is_match(selector.as_str()) || !self.css_hidden.is_match(body) {
                    return None;
                }
                // Dòng bắt đầu selector, bỏ qua whitespace đầu
                let leading = selector.as_str().len() - selector.as_str().trim_start().len();
                let start = selector.start() + leading;
                let line = content[..start].matches('\n').count() + 1;
                Some(finding(path, line, LintRule::CssOnlyProtection, selector.as_str()))
            })
            .collect()
    }
}

fn finding(path: &Path, line: usize, rule: LintRule, snippet: &str) -> LintFinding {
    LintFinding {
        file: path.to_path_buf(),
        line,
        rule,
        snippet: snippet.trim().to_string(),
    }
}

fn collect_sources(dir: &Path, out: &mut Vec<(PathBuf, SourceKind)>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources(&path, out)?;
        } else if let Some(kind) = SourceKind::from_path(&path) {
            out.push((path, kind));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn linter() -> RbacLinter {
        RbacLinter::new().unwrap()
    }

    fn html(content: &str) -> Vec<LintFinding> {
        linter().lint_source(Path::new("t.html"), SourceKind::Html, content)
    }

    #[test]
    fn test_unguarded_html_link() {
        let findings = html("<nav>\n<a href=\"/compliance/aml\">AML</a>\n</nav>\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, LintRule::UnguardedLink);
        assert_eq!(findings[0].line, 2);
    }

    #[test]
    fn test_guarded_html_is_clean() {
        let content = "{% if has_permission('view_compliance') %}\n<a href=\"/compliance\">C</a>\n{% endif %}";
        assert!(html(content).is_empty());
    }

    #[test]
    fn test_url_for_and_prefix_boundaries() {
        let findings = html("<a href=\"{{ url_for('nvct_stablecoin.mint') }}\">Mint</a>");
        assert_eq!(findings.len(), 1);
        // "/compliancex" và "/accounts" không phải route được bảo vệ
        assert!(html("<a href=\"/compliancex\">x</a>\n<a href=\"/accounts\">a</a>").is_empty());
    }

    #[test]
    fn test_hardcoded_role_check() {
        let findings = html("{% if current_user.role == 'admin' and has_permission('x') %}");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, LintRule::HardcodedRoleCheck);
    }

    #[test]
    fn test_js_calls() {
        let l = linter();
        let js = "async function load() {\n  const r = await fetch('/sovereign/portfolios');\n  xhr.open(\"POST\", \"/treasury/transfer\");\n  fetch('/accounts');\n}";
        let findings = l.lint_source(Path::new("a.js"), SourceKind::Js, js);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[1].line, 3);

        let gated = format!("if (!hasPermission('view_sovereign')) return;\n{}", js);
        assert!(l.lint_source(Path::new("a.js"), SourceKind::Js, &gated).is_empty());
    }

    #[test]
    fn test_css_only_protection() {
        let css = ".card { color: red; }\n\n.admin-only {\n  display: none;\n}\n[data-role=\"customer\"] .panel { visibility: hidden }\n.hidden { display: none }\n";
        let findings = linter().lint_source(Path::new("s.css"), SourceKind::Css, css);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 3);
        assert_eq!(findings[0].snippet, ".admin-only");
        assert_eq!(findings[1].line, 6);
    }

    #[test]
    fn test_lint_dir() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates/admin");
        let static_dir = dir.path().join("static/js");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(&static_dir).unwrap();

        fs::write(templates.join("users.html"), "<a href=\"/user-management/users\">Users</a>").unwrap();
        fs::write(
            templates.join("ok.html"),
            "{% if has_permission('view_users') %}<a href=\"/user-management\">U</a>{% endif %}",
        )
        .unwrap();
        fs::write(static_dir.join("app.js"), "fetch(`/security-center/status`)").unwrap();
        fs::write(dir.path().join("README.md"), "href=\"/compliance\"").unwrap();

        let report = linter().lint_dir(dir.path()).unwrap();
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.count(LintRule::UnguardedLink), 1);
        assert_eq!(report.count(LintRule::UnguardedApiCall), 1);
        assert!(!report.is_clean());

        let rows = report.rows();
        assert!(rows.iter().any(|r| r[0] == "templates/admin/users.html"));
    }

    #[test]
    fn test_missing_dir_is_error() {
        assert!(linter().lint_dir(Path::new("/definitely/not/here")).is_err());
    }
}
