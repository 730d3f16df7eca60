//! Shell escaping and quoting utilities.

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument for shell execution.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Embedded single quotes are escaped
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    // Characters that require quoting
    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~', '=',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", escape_single_quote_content(arg))
}

/// Wrap a complete command line (with operators) so it survives one more
/// round of shell parsing, e.g. as the command argument of `ssh`.
pub fn escape_command_for_shell(command: &str) -> String {
    format!("'{}'", escape_single_quote_content(command))
}

/// Replace every occurrence of each non-empty secret with `****`.
///
/// A secret that went through [`quote_arg`] and then
/// [`escape_command_for_shell`] only survives in escaped form, so the once-
/// and twice-escaped spellings are masked too, longest first.
pub fn mask_secrets(text: &str, secrets: &[String]) -> String {
    let mut forms: Vec<String> = Vec::new();
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        let once = escape_single_quote_content(secret);
        let twice = escape_single_quote_content(&once);
        forms.extend([secret.clone(), once, twice]);
    }
    forms.sort_by_key(|form| std::cmp::Reverse(form.len()));
    forms.dedup();

    forms
        .iter()
        .fold(text.to_string(), |acc, form| acc.replace(form.as_str(), "****"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_arg_simple() {
        assert_eq!(quote_arg("docker-compose.yml"), "docker-compose.yml");
        assert_eq!(quote_arg("/home/ec2-user/app"), "/home/ec2-user/app");
    }

    #[test]
    fn quote_arg_with_spaces() {
        assert_eq!(quote_arg("my app"), "'my app'");
    }

    #[test]
    fn quote_arg_with_single_quote() {
        assert_eq!(quote_arg("it's"), "'it'\\''s'");
    }

    #[test]
    fn quote_arg_with_assignment() {
        assert_eq!(quote_arg("APP_SECRET=abc"), "'APP_SECRET=abc'");
    }

    #[test]
    fn quote_arg_empty() {
        assert_eq!(quote_arg(""), "''");
    }

    #[test]
    fn escape_command_wraps_operators() {
        assert_eq!(
            escape_command_for_shell("cd /srv && docker-compose ps"),
            "'cd /srv && docker-compose ps'"
        );
        assert_eq!(
            escape_command_for_shell("echo 'x'"),
            "'echo '\\''x'\\'''"
        );
    }

    #[test]
    fn mask_secrets_hides_values() {
        let secrets = vec!["hunter2".to_string(), String::new()];
        assert_eq!(
            mask_secrets("export APP_SECRET=hunter2 && up", &secrets),
            "export APP_SECRET=**** && up"
        );
    }

    #[test]
    fn mask_secrets_hides_quoted_and_escaped_forms() {
        let secret = "it's-hidden".to_string();
        let remote = escape_command_for_shell(&format!(
            "export APP_SECRET={} && up",
            quote_arg(&secret)
        ));

        let masked = mask_secrets(&remote, &[secret]);
        assert!(!masked.contains("hidden"), "{}", masked);
        assert!(masked.contains("****"));
    }
}
