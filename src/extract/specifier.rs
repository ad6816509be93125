//! Import specifier extraction from JavaScript-family source text.

use std::collections::BTreeSet;

use regex::Regex;

/// Node built-in modules, importable with or without the `node:` prefix.
pub const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Whether `specifier` names a Node built-in module.
pub fn is_builtin(specifier: &str) -> bool {
    specifier.starts_with("node:") || BUILTIN_MODULES.contains(&specifier)
}

/// Pulls raw module specifiers out of source text.
pub trait SpecifierExtractor: Send + Sync {
    /// Every specifier string found in `code`, unfiltered, in no particular order.
    fn specifiers(&self, code: &str) -> Vec<String>;

    /// Package names imported by `code`.
    fn packages(&self, code: &str) -> BTreeSet<String> {
        filter_specifiers(self.specifiers(code))
    }
}

/// Regex-based extractor.
///
/// Recognizes `import("x")`, `require("x")`, `import "x"` and `... from "x"`
/// after removing comments. Template literals and computed specifiers are
/// not followed.
#[derive(Debug, Clone)]
pub struct RegexExtractor {
    comments: Regex,
    dynamic: Regex,
    statics: Regex,
}

impl RegexExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self {
            comments: Regex::new(r"(?s:/\*.*?\*/)|//[^\n]*").expect("valid regex"),
            dynamic: Regex::new(r#"\b(?:import|require)\s*\(\s*(?:'([^'\n]+)'|"([^"\n]+)")"#)
                .expect("valid regex"),
            statics: Regex::new(r#"\b(?:import|from)\s*(?:'([^'\n]+)'|"([^"\n]+)")"#)
                .expect("valid regex"),
        }
    }

    /// Remove block and line comments from `code`.
    pub fn strip_comments(&self, code: &str) -> String {
        self.comments.replace_all(code, "").into_owned()
    }
}

impl Default for RegexExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecifierExtractor for RegexExtractor {
    fn specifiers(&self, code: &str) -> Vec<String> {
        let code = self.strip_comments(code);

        [&self.dynamic, &self.statics]
            .into_iter()
            .flat_map(|re| re.captures_iter(&code))
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Reduce raw specifiers to installable package names.
///
/// Drops relative and path-only specifiers (anything not starting with a word
/// character or `@`) and Node built-ins. Scoped names keep `@scope/name`;
/// unscoped names keep their first segment.
///
/// # Examples
///
/// ```
/// use n_pm::extract::filter_specifiers;
///
/// let found = filter_specifiers(vec![
///     "./local".to_string(),
///     "lodash/merge".to_string(),
///     "@vue/reactivity/dist".to_string(),
///     "node:fs".to_string(),
/// ]);
/// assert_eq!(found.into_iter().collect::<Vec<_>>(), ["@vue/reactivity", "lodash"]);
/// ```
pub fn filter_specifiers<I>(specifiers: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    specifiers
        .into_iter()
        .filter(|s| is_package_like(s) && !is_builtin(s))
        .filter_map(|s| package_name(&s))
        .filter(|name| !is_builtin(name))
        .collect()
}

fn is_package_like(specifier: &str) -> bool {
    match specifier.chars().next() {
        Some('@') => true,
        Some(c) => c.is_alphanumeric() || c == '_',
        None => false,
    }
}

fn package_name(specifier: &str) -> Option<String> {
    if specifier.starts_with('@') {
        let mut parts = specifier.splitn(3, '/');
        let scope = parts.next()?;
        let name = parts.next().filter(|n| !n.is_empty())?;
        if scope.len() < 2 {
            return None;
        }
        Some(format!("{scope}/{name}"))
    } else {
        specifier.split('/').next().map(String::from)
    }
}
