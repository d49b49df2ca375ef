use std::fs;

use anyhow::{Context, Result};

use nmr_correlate::CorrelationConfig;

use crate::cli::CorrelationOptions;

/// Options file first, then command-line overrides on top.
pub fn build_correlation_config(opts: &CorrelationOptions) -> Result<CorrelationConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {}", path.display()))?;
            CorrelationConfig::from_toml(&text)
                .with_context(|| format!("Invalid options file: {}", path.display()))?
        }
        None => CorrelationConfig::default(),
    };

    if let Some(formula) = &opts.formula {
        config.formula = formula.clone();
    }

    for t in &opts.tolerances {
        config
            .tolerance
            .set(t.atom_type, t.value)
            .context("Invalid tolerance override")?;
    }

    Ok(config)
}
