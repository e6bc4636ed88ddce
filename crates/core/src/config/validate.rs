use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - video duration bounds are ordered and non-zero
/// - at least one result per footage search
/// - at least one concurrent job slot
///
/// A missing Pexels API key only warns: the retrieval stage degrades to
/// empty picks rather than refusing to start.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.planner.min_video_duration == 0 {
        return Err(ConfigError::ValidationError(
            "planner.min_video_duration cannot be 0".to_string(),
        ));
    }
    if config.planner.max_video_duration < config.planner.min_video_duration {
        return Err(ConfigError::ValidationError(format!(
            "planner.max_video_duration ({}) is below planner.min_video_duration ({})",
            config.planner.max_video_duration, config.planner.min_video_duration
        )));
    }
    if config.assets.pexels.per_page == 0 {
        return Err(ConfigError::ValidationError(
            "assets.pexels.per_page cannot be 0".to_string(),
        ));
    }
    if config.orchestrator.max_concurrent_jobs == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.max_concurrent_jobs cannot be 0".to_string(),
        ));
    }

    if config.assets.pexels.api_key.is_empty() {
        tracing::warn!("PEXELS API key not set; stock footage retrieval will return no clips");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_inverted_duration_bounds_rejected() {
        let mut config = Config::default();
        config.planner.min_video_duration = 120;
        config.planner.max_video_duration = 60;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zero_per_page_rejected() {
        let mut config = Config::default();
        config.assets.pexels.per_page = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_job_slots_rejected() {
        let mut config = Config::default();
        config.orchestrator.max_concurrent_jobs = 0;
        assert!(validate_config(&config).is_err());
    }
}
