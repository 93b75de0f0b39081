//! Configuration commands.
//!
//! - `config show`: Display the effective configuration
//! - `config set`: Set a value in the configuration file
//! - `config path`: Print where the configuration file lives

use owo_colors::OwoColorize;
use serde_json::json;

use super::print_json;
use crate::config::Config;
use crate::error::Result;

/// Mask a secret, keeping only its first and last two characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn format_config(config: &Config) -> String {
    let not_set = || "not set".dimmed().to_string();
    let token = config
        .api
        .token
        .as_deref()
        .map(mask_sensitive_value)
        .unwrap_or_else(not_set);

    let mut lines = vec![format!("{}\n", "Configuration:".cyan().bold())];
    lines.push(format!("{}: {}", "backend".cyan(), config.backend));
    lines.push(format!("{}:", "api".cyan()));
    lines.push(format!("  base_url: {}", config.api.base_url));
    lines.push(format!("  token: {token}"));
    lines.push(format!("  timeout_secs: {}", config.api.timeout_secs));
    lines.push(format!(
        "  connect_timeout_secs: {}",
        config.api.connect_timeout_secs
    ));
    lines.push(format!(
        "{}: {}",
        "default_project".cyan(),
        config.default_project.clone().unwrap_or_else(not_set)
    ));
    lines.push(format!("{}: {}", "log_level".cyan(), config.log_level()));
    lines.join("\n")
}

/// Show the effective configuration (file plus environment overrides)
pub fn cmd_config_show(config: &Config, output_json: bool) -> Result<()> {
    if output_json {
        return print_json(&json!({
            "backend": config.backend,
            "api": {
                "base_url": config.api.base_url,
                "token_configured": config.api.token.is_some(),
                "timeout_secs": config.api.timeout_secs,
                "connect_timeout_secs": config.api.connect_timeout_secs,
            },
            "default_project": config.default_project,
            "log_level": config.log_level(),
            "config_file": Config::config_path()?.to_string_lossy(),
        }));
    }

    println!("{}", format_config(config));
    println!(
        "\n{}",
        format!("Config file: {}", Config::config_path()?.display()).dimmed()
    );
    Ok(())
}

/// Set a value in the configuration file. Environment overrides are not
/// written back.
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_file()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if key == "api.token" {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };
    println!("Set {} to {}", key.cyan(), shown);
    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_sensitive_value() {
        assert_eq!(mask_sensitive_value("sk-live-123456"), "sk...56");
        assert_eq!(mask_sensitive_value("abcd"), "****");
    }

    #[test]
    fn test_format_config_never_prints_token() {
        let mut config = Config::default();
        config.api.token = Some("secret-token-value".to_string());
        let text = format_config(&config);
        assert!(!text.contains("secret-token-value"));
        assert!(text.contains("se...ue"));
        assert!(text.contains("http://localhost:8080/api"));
    }
}
