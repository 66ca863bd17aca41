use std::{path::Path, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// A missing provider binding is allowed and only disables that tool.
    /// A binding that is present must carry a usable key.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_imagegen()?;
        self.validate_bgremove()?;
        self.validate_storage()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got '{}'", health.path);
        }

        if self.server.body_limit == 0 {
            anyhow::bail!("server.body_limit must be greater than 0");
        }

        Ok(())
    }

    fn validate_imagegen(&self) -> anyhow::Result<()> {
        require_timeout("imagegen", self.imagegen.timeout)?;

        if let Some(ref provider) = self.imagegen.provider {
            require_api_key("imagegen", provider.api_key.as_ref())?;
            validate_base_url("imagegen", provider.base_url.as_deref())?;

            if provider.steps == Some(0) {
                anyhow::bail!("imagegen.provider.steps must be greater than 0");
            }
        }

        Ok(())
    }

    fn validate_bgremove(&self) -> anyhow::Result<()> {
        require_timeout("bgremove", self.bgremove.timeout)?;

        if let Some(ref provider) = self.bgremove.provider {
            require_api_key("bgremove", provider.api_key.as_ref())?;
            validate_base_url("bgremove", provider.base_url.as_deref())?;
        }

        Ok(())
    }

    fn validate_storage(&self) -> anyhow::Result<()> {
        if self.storage.database_url.trim().is_empty() {
            anyhow::bail!("storage.database_url must not be empty");
        }

        if self.storage.max_connections == 0 {
            anyhow::bail!("storage.max_connections must be greater than 0");
        }

        if self.storage.placeholder_url.trim().is_empty() {
            anyhow::bail!("storage.placeholder_url must not be empty");
        }

        Ok(())
    }
}

fn require_timeout(section: &str, timeout: Duration) -> anyhow::Result<()> {
    if timeout.is_zero() {
        anyhow::bail!("{section}.timeout must be greater than 0");
    }

    Ok(())
}

fn require_api_key(section: &str, key: Option<&SecretString>) -> anyhow::Result<()> {
    match key {
        Some(key) if !key.expose_secret().trim().is_empty() => Ok(()),
        _ => anyhow::bail!("{section}.provider.api_key must be set; use {{{{ env.VAR }}}} to inject it"),
    }
}

fn validate_base_url(section: &str, base_url: Option<&str>) -> anyhow::Result<()> {
    if let Some(base_url) = base_url {
        url::Url::parse(base_url).map_err(|e| anyhow::anyhow!("invalid {section}.provider.base_url '{base_url}': {e}"))?;
    }

    Ok(())
}
