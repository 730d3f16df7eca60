//! Dotenv-style `KEY=VALUE` files.
//!
//! Values read here sit underneath the real process environment: a variable
//! that is already exported always wins over the file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Default env file looked up in the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Variables parsed from an env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Load `path` if it exists. A missing file yields an empty set.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
        })?;

        let env = Self::parse(&content)?;
        log_status!(
            "env",
            "Loaded {} variable(s) from {}",
            env.vars.len(),
            path.display()
        );
        Ok(env)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut vars = HashMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);

            match line.split_once('=') {
                Some((key, _)) if key.trim().is_empty() => {
                    return Err(Error::config_invalid_value(
                        "env_file",
                        Some(raw.to_string()),
                        format!("line {}: key cannot be empty", idx + 1),
                    ));
                }
                Some((key, value)) => {
                    vars.insert(key.trim().to_string(), unquote(value.trim()));
                }
                None => {
                    return Err(Error::config_invalid_value(
                        "env_file",
                        Some(raw.to_string()),
                        format!("line {}: expected KEY=VALUE", idx + 1),
                    ));
                }
            }
        }

        Ok(Self { vars })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Resolve `key` from the process environment first, then from the file.
    ///
    /// An exported but blank variable does not hide the file's value.
    pub fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.get(key).map(str::to_string))
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    // Unquoted values may carry a trailing comment.
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end().to_string(),
        None => value.to_string(),
    }
}
