use tickscene_common::EntityId;

/// Misuse of the ECS contract. These are programmer errors, never transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// A component was attached to an entity that is not live.
    #[error("entity {0} is not live")]
    InvalidEntity(EntityId),
    /// A store was accessed with the wrong shape or payload type.
    #[error("component `{component}` is a {found}, expected a {expected}")]
    InvalidStoreKind {
        component: String,
        expected: String,
        found: String,
    },
    #[error("component `{0}` is not registered")]
    UnknownComponent(String),
    #[error("component `{0}` is already registered")]
    DuplicateComponent(String),
}
