// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${VAR}` / `${VAR:-default}` environment variable interpolation, applied
//! to a runbook's raw text before it is parsed as YAML.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static ENV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)(?::-([^}]*))?\}").expect("constant regex pattern is valid"));

/// An unknown environment variable appeared with no `:-default` fallback.
#[derive(Debug, Clone, thiserror::Error)]
#[error("undefined environment variable {0:?} referenced with no default")]
pub struct UndefinedVar(pub String);

/// Expand every `${VAR}` or `${VAR:-default}` placeholder in `content`
/// using `lookup` to resolve variable names. A bare `${VAR}` with no
/// matching variable and no default is an error; `${VAR:-default}` falls
/// back to `default` instead.
pub fn interpolate(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String, UndefinedVar> {
    let mut error = None;
    let result = ENV_PATTERN.replace_all(content, |caps: &regex::Captures| {
        let name = &caps[1];
        match (lookup(name), caps.get(2)) {
            (Some(value), _) => value,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                if error.is_none() {
                    error = Some(UndefinedVar(name.to_string()));
                }
                String::new()
            }
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(result.into_owned()),
    }
}

/// Expand placeholders against the process environment.
pub fn interpolate_from_process_env(content: &str) -> Result<String, UndefinedVar> {
    interpolate(content, |name| std::env::var(name).ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
