use super::TreeParseError;
use crate::TreeFloat;
use crate::phylo::{Node, NodeId, Tree};
use tracing::{debug, trace};

/// Checks if a character is a NEWICK structural delimiter.
fn is_structural_delimiter(character: char) -> bool {
    matches!(character, ';' | '(' | ')' | ',' | ':')
}

/// Splits a NEWICK string into delimiter tokens and the trimmed text between
/// them. Whitespace-only fragments are dropped; whitespace inside a label is
/// kept.
pub(crate) fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    let mut start: usize = 0;
    for (position, character) in s.char_indices() {
        if is_structural_delimiter(character) {
            let fragment = s[start..position].trim();
            if !fragment.is_empty() {
                tokens.push(fragment);
            }
            tokens.push(&s[position..position + character.len_utf8()]);
            start = position + character.len_utf8();
        }
    }
    let fragment = s[start..].trim();
    if !fragment.is_empty() {
        tokens.push(fragment);
    }
    tokens
}

/// Reads a confidence value. Anything that is not a finite number counts as
/// no confidence at all.
fn parse_confidence(token: &str) -> Option<TreeFloat> {
    token.parse::<TreeFloat>().ok().filter(|value| value.is_finite())
}

/// Cursor and ancestor stack for the token walk.
///
/// The stack replaces recursion, so nesting depth is limited only by memory.
#[derive(Debug)]
struct ParserState {
    cursor: NodeId,
    ancestors: Vec<NodeId>,
}

impl ParserState {
    fn handle_open_paren(&mut self, tree: &mut Tree) -> Result<(), TreeParseError> {
        let child_id = tree.seed_children(Node::new(), self.cursor)?;
        self.ancestors.push(self.cursor);
        self.cursor = child_id;
        Ok(())
    }

    fn handle_comma(&mut self, tree: &mut Tree, token: usize) -> Result<(), TreeParseError> {
        let parent_id = *self
            .ancestors
            .last()
            .ok_or(TreeParseError::CommaOutsideGroup { token })?;
        self.cursor = tree.add_node(Node::new(), Some(parent_id))?;
        Ok(())
    }

    fn handle_close_paren(
        &mut self,
        tree: &mut Tree,
        token: usize,
        next_token: Option<&str>,
    ) -> Result<(), TreeParseError> {
        self.cursor = self.ancestors.pop().ok_or(TreeParseError::UnmatchedClose { token })?;
        if let Some(confidence) = next_token.and_then(parse_confidence)
            && let Some(node) = tree.node_mut(Some(self.cursor))
        {
            node.set_confidence(Some(confidence));
        }
        Ok(())
    }

    fn handle_label(&mut self, tree: &mut Tree, label: &str, previous_token: Option<&str>) {
        let names_node = match previous_token {
            None => true,
            Some(previous) => matches!(previous, "(" | ")" | ","),
        };
        if names_node && let Some(node) = tree.node_mut(Some(self.cursor)) {
            node.set_name(Some(label));
        }
    }
}

/// Parses a NEWICK formatted string into a [Tree].
///
/// A numeral directly after `)` is stored as the confidence of the node that
/// `)` closes. Text after `:` is tokenized and discarded, so branch lengths
/// are never read.
///
/// ```
/// let tree = phylolayout::parse_newick("((A,B)0.9,C);").unwrap();
/// assert_eq!(tree.tip_count_all(), 3);
/// ```
pub fn parse_newick(s: &str) -> Result<Tree, TreeParseError> {
    let tokens = tokenize(s);
    if tokens.iter().all(|&token| token == ";") {
        return Err(TreeParseError::Empty);
    }

    let mut tree = Tree::new();
    let first_node_id = tree.add_node(Node::new(), None)?;
    let mut state = ParserState { cursor: first_node_id, ancestors: Vec::new() };

    for (i, &token) in tokens.iter().enumerate() {
        match token {
            "(" => state.handle_open_paren(&mut tree)?,
            "," => state.handle_comma(&mut tree, i)?,
            ")" => state.handle_close_paren(&mut tree, i, tokens.get(i + 1).copied())?,
            ":" | ";" => {}
            label => {
                let previous_token = if i > 0 { Some(tokens[i - 1]) } else { None };
                state.handle_label(&mut tree, label, previous_token);
            }
        }
        trace!(token, depth = state.ancestors.len());
    }

    if !state.ancestors.is_empty() {
        return Err(TreeParseError::Unclosed { open: state.ancestors.len() });
    }

    let _ = tree.validate()?;
    debug!(
        tokens = tokens.len(),
        nodes = tree.node_count_all(),
        tips = tree.tip_count_all(),
        "parsed NEWICK tree"
    );
    Ok(tree)
}
