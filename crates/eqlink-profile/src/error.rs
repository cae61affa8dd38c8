use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(String),

    #[error("YAML mapping keys must be strings")]
    NonStringKey,

    #[error("unsupported YAML value (tags are not representable)")]
    UnsupportedYamlValue,

    #[error("YAML number could not be represented as f64")]
    YamlNumber,

    #[error("catalog document must be a mapping")]
    DocumentNotMap,

    #[error("equipment definition block is not a mapping")]
    BlockNotRecord,

    #[error("data integrity violation: {message}")]
    Integrity { message: String },
}
