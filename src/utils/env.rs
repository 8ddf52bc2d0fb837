use crate::error::{AgentCoreError, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Load environment variables from file
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path)?;

    let mut env_vars = HashMap::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            env_vars.insert(key.trim().to_string(), unquote(value.trim()));
        } else {
            return Err(AgentCoreError::Validation(format!(
                "Invalid env format at {}:{}: {}",
                path.display(),
                line_num + 1,
                line
            )));
        }
    }

    Ok(env_vars)
}

/// Set `key` in an env file, replacing an existing assignment or appending a
/// new one. Comments and unrelated lines are kept as they are.
pub fn set_env_var(path: &Path, key: &str, value: &str) -> Result<()> {
    check_assignment(key, value)?;

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let assignment = format!("{}={}", key, quote(value));
    let mut replaced = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            let is_target = line
                .split_once('=')
                .is_some_and(|(k, _)| k.trim() == key && !line.trim_start().starts_with('#'));
            if is_target && !replaced {
                replaced = true;
                assignment.clone()
            } else {
                line.to_string()
            }
        })
        .collect();
    if !replaced {
        lines.push(assignment);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = lines.join("\n");
    out.push('\n');
    fs::write(path, out)?;
    tracing::debug!(path = %path.display(), key, "env var written");
    Ok(())
}

/// Reject a key or value that cannot be stored as a single env file line.
pub fn check_assignment(key: &str, value: &str) -> Result<()> {
    if key.is_empty() || key.contains('=') || key.contains(char::is_whitespace) {
        return Err(AgentCoreError::Validation(format!(
            "invalid environment variable name '{}'",
            key
        )));
    }
    if value.contains(['\r', '\n']) {
        return Err(AgentCoreError::Validation(format!(
            "value for {} must not contain line breaks",
            key
        )));
    }
    Ok(())
}

fn quote(value: &str) -> String {
    if value.is_empty() || value.contains(|c: char| c.is_whitespace() || c == '#' || c == '"') {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}
