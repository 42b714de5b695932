use crate::config::types::{Config, CrawlerConfig};
use crate::strategy::StrategyRegistry;
use crate::url::ExcludePattern;
use crate::ConfigError;
use reqwest::Method;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(config)?;
    validate_crawler_config(&config.crawler)?;
    validate_exclude_patterns(&config.exclude)?;
    validate_strategy(config.strategy.as_deref())?;
    Ok(())
}

/// Validates seed sitemaps and URLs
fn validate_seeds(config: &Config) -> Result<(), ConfigError> {
    if config.sitemaps.is_empty() && config.urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one sitemap or url is required".to_string(),
        ));
    }

    if let Some(seed) = config
        .sitemaps
        .iter()
        .chain(config.urls.iter())
        .find(|seed| seed.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "seed locations cannot be empty, got '{}'",
            seed
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    validate_request_method(&config.request_method)?;

    let [low, high] = config.success_status;
    if low > high || low < 100 || high > 599 {
        return Err(ConfigError::Validation(format!(
            "success-status must be an ordered range within 100..=599, got [{}, {}]",
            low, high
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the warmup request method
fn validate_request_method(method: &str) -> Result<(), ConfigError> {
    let parsed = method.to_uppercase().parse::<Method>().map_err(|_| {
        ConfigError::Validation(format!("invalid request-method '{}'", method))
    })?;

    if [Method::HEAD, Method::GET, Method::OPTIONS].contains(&parsed) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "request-method must be HEAD, GET or OPTIONS, got '{}'",
            parsed
        )))
    }
}

/// Validates that every exclude pattern compiles
fn validate_exclude_patterns(patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        ExcludePattern::parse(pattern)?;
    }
    Ok(())
}

/// Validates that the strategy name is registered
fn validate_strategy(strategy: Option<&str>) -> Result<(), ConfigError> {
    match strategy {
        Some(name) => StrategyRegistry::with_defaults().create(name).map(|_| ()),
        None => Ok(()),
    }
}
