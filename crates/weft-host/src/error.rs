use weft::NodeKey;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("graph has no nodes to lay out")]
    NoNodes,
    #[error("graph is read-only")]
    ReadOnly,
    #[error("graph schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },
    #[error("duplicate node key: {key}")]
    DuplicateNodeKey { key: NodeKey },
    #[error("link references unknown pin {pin} on node {node}")]
    UnknownPin { node: NodeKey, pin: String },
    #[error("no nodes selected for auto layout")]
    NoSelection,
    #[error("selected node is not part of the graph: {key}")]
    SelectionOutsideGraph { key: NodeKey },
    #[error("no connected components found for the selected nodes")]
    NoComponents,
    #[error(transparent)]
    Layout(#[from] weft::Error),
}

impl HostError {
    /// Short, user-facing hint on how to recover.
    pub fn guidance(&self) -> &'static str {
        match self {
            HostError::NoNodes => "Add nodes to the graph and retry.",
            HostError::ReadOnly => "Choose a writable graph and retry.",
            HostError::SchemaMismatch { .. } => "Export the graph with the exec/data schema.",
            HostError::DuplicateNodeKey { .. } => "Regenerate node keys and retry.",
            HostError::UnknownPin { .. } => "Re-export links so they name existing pins.",
            HostError::NoSelection | HostError::SelectionOutsideGraph { .. } => {
                "Select nodes in the graph and retry."
            }
            HostError::NoComponents => "Select nodes connected by pins and retry.",
            HostError::Layout(_) => "Verify the graph connectivity and retry.",
        }
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
