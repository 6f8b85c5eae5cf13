//! Configuration inspection

use anyhow::{Context, Result};
use livequiz_core::QuizConfig;

/// Print the effective configuration as TOML
pub fn handle_config_command(config: &QuizConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("rendering configuration")?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_parses_back() {
        let config = QuizConfig {
            allocation_attempts: 7,
            ..QuizConfig::default()
        };
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert_eq!(QuizConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
