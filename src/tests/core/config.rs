#[cfg(test)]
mod tests {
    use crate::agent::RagSettings;
    use crate::config::{CasebookConfig, DEFAULT_QUERY};
    use crate::tests::helpers::unique_temp_dir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = unique_temp_dir("config_missing");
        let config = CasebookConfig::load(temp_dir.path().join("casebook.toml")).unwrap();

        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.query, DEFAULT_QUERY);
        assert_eq!(config.embedding.max_length, 512);
        assert_eq!(config.generation.model, "llama3-8b-8192");
        assert_eq!(config.generation.max_tokens, 1024);
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let temp_dir = unique_temp_dir("config_partial");
        let path = temp_dir.path().join("casebook.toml");
        std::fs::write(
            &path,
            r#"
store_path = "kb/docs.json"

[retrieval]
top_k = 5

[generation]
model = "llama-3.1-8b-instant"
timeout_secs = 15
"#,
        )
        .unwrap();

        let config = CasebookConfig::load(&path).unwrap();
        assert_eq!(config.store_path, std::path::PathBuf::from("kb/docs.json"));
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.query, DEFAULT_QUERY);
        assert_eq!(config.generation.model, "llama-3.1-8b-instant");
        assert_eq!(config.generation.timeout_secs, 15);
        assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);

        let settings = RagSettings::from_config(&config);
        assert_eq!(settings.top_k, 5);
        assert_eq!(settings.model, "llama-3.1-8b-instant");
        assert_eq!(settings.sampling.max_tokens, 1024);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp_dir = unique_temp_dir("config_invalid");
        let path = temp_dir.path().join("casebook.toml");
        std::fs::write(&path, "[retrieval]\ntop_k = 0\n").unwrap();

        let err = CasebookConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let temp_dir = unique_temp_dir("config_malformed");
        let path = temp_dir.path().join("casebook.toml");
        std::fs::write(&path, "top_k = = 3").unwrap();

        assert!(CasebookConfig::load(&path).is_err());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(CasebookConfig::default().validate().is_ok());
    }
}
