pub(crate) mod newick;

use super::phylo::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeParseError {
    #[error("NEWICK string contains no nodes.")]
    Empty,
    #[error("Unmatched ')' at token {token}.")]
    UnmatchedClose { token: usize },
    #[error("{open} '(' left unclosed at end of input.")]
    Unclosed { open: usize },
    #[error("',' at token {token} is not inside a group.")]
    CommaOutsideGroup { token: usize },
    #[error(transparent)]
    TreeError(#[from] TreeError),
}
