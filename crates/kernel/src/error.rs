use tickscene_ecs::EcsError;
use tickscene_physics::PhysicsError;

/// Failure inside a single system invocation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Ecs(#[from] EcsError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// A tick that was cut short by a failing system.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("system `{system}` failed on tick {tick}")]
pub struct TickError {
    pub system: String,
    pub tick: u64,
    #[source]
    pub source: SystemError,
}

/// Errors from loading or validating a `SceneConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors from building a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ecs(#[from] EcsError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
