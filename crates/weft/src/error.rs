use crate::model::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("layout component is empty")]
    EmptyComponent,
    #[error("missing node id in layout graph: {id}")]
    MissingNode { id: NodeId },
}

pub type Result<T> = std::result::Result<T, Error>;
