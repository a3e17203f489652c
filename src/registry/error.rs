/// Errors that can occur during registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("query not registered: {0}")]
    QueryNotFound(usize),
}
