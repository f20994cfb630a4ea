//! Namespace scopes and qualifier resolution.
//!
//! Every `namespace ... {` in the token stream becomes a [`ScopeNode`] holding
//! the byte offsets of its braces and a link to the enclosing namespace. Nodes
//! are stored in discovery order, so nested namespaces always come after their
//! parents and their ranges overlap.

use crate::lexer::TokenStream;
use crate::types::ScopeRange;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeNode {
    /// Verbatim text between `namespace` and `{`: may be qualified (`a::b`) or empty.
    pub name: String,
    /// Offset of the opening `{`.
    pub start: usize,
    /// Offset of the matching `}`.
    pub end: usize,
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl ScopeTree {
    pub fn build(stream: &TokenStream) -> Self {
        let mut nodes: Vec<ScopeNode> = Vec::new();
        // (closing token index, node index) of namespaces still open
        let mut open: Vec<(usize, usize)> = Vec::new();

        for idx in 0..stream.len() {
            while open.last().is_some_and(|&(close, _)| close < idx) {
                open.pop();
            }

            if !stream.is_ident(idx, "namespace") {
                continue;
            }

            // `using namespace std;` and `namespace fs = std::filesystem;` open nothing
            let Some(brace) = (idx + 1..stream.len())
                .take_while(|&i| !stream.is_punct(i, ';'))
                .find(|&i| stream.is_punct(i, '{'))
            else {
                continue;
            };
            let Some(close) = stream.closer(brace) else {
                continue;
            };

            let node = ScopeNode {
                name: stream.text_between(idx + 1, brace).trim().to_string(),
                start: stream.offset(brace),
                end: stream.offset(close),
                parent: open.last().map(|&(_, node)| node),
            };
            debug!(name = node.name.as_str(), start = node.start, end = node.end, "Namespace");
            open.push((close, nodes.len()));
            nodes.push(node);
        }

        Self { nodes }
    }

    pub fn nodes(&self) -> &[ScopeNode] {
        &self.nodes
    }

    /// Flat view of every namespace occurrence in discovery order.
    pub fn ranges(&self) -> Vec<ScopeRange> {
        self.nodes
            .iter()
            .map(|n| ScopeRange { name: n.name.clone(), start: n.start, end: n.end })
            .collect()
    }

    /// `::`-joined names of every namespace enclosing `offset`, outermost first.
    /// Anonymous namespaces contribute nothing.
    pub fn qualifier_at(&self, offset: usize) -> String {
        // Later nodes start later, so the last one containing the offset is innermost.
        let innermost = self.nodes.iter().rposition(|n| n.start <= offset && offset <= n.end);

        let mut names = Vec::new();
        let mut current = innermost;
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if !node.name.is_empty() {
                names.push(node.name.as_str());
            }
            current = node.parent;
        }
        names.reverse();
        names.join("::")
    }
}
