use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("env var pattern is valid"));

/// Expand `${VAR}` and `${VAR:-default}` references in a single line.
///
/// Every reference to an unset variable without a default is collected, so the error names all of them at once.
pub fn interpolate_env_vars(input: &str) -> Result<String> {
    let mut missing = Vec::new();

    let expanded = ENV_VAR_PATTERN.replace_all(input, |caps: &Captures<'_>| match std::env::var(&caps[1]) {
        Ok(value) => value,
        Err(_) => match caps.get(2) {
            Some(default) => default.as_str().to_string(),
            None => {
                if !missing.iter().any(|name| name == &caps[1]) {
                    missing.push(caps[1].to_string());
                }
                caps[0].to_string()
            }
        },
    });

    if !missing.is_empty() {
        anyhow::bail!("Missing required environment variables: {}", missing.join(", "));
    }

    Ok(expanded.into_owned())
}

/// Expand env references in YAML content, leaving comment lines untouched.
pub fn interpolate_yaml_content(yaml_content: &str) -> Result<String> {
    let lines = yaml_content
        .lines()
        .map(|line| if line.trim_start().starts_with('#') { Ok(line.to_string()) } else { interpolate_env_vars(line) })
        .collect::<Result<Vec<_>>>()?;

    Ok(lines.join("\n"))
}
