//! Arena-backed proof tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Child lists
//! are the owning edges; `parent` is a plain back-link used for ancestor walks.
//! Nodes are never removed: a goal that is expanded becomes the first new
//! formula node in place, and a closed goal stays in the tree.

use std::{fmt, num::ParseIntError, ops::Index, str::FromStr};

use crate::{
    prover::{
        error::ProverError,
        rules::{Expansion, Fragment, RuleKind},
    },
    term::{Substitution, Term},
};

/// Truth value a node asserts for its formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    /// `T`: the formula holds.
    Affirmed,
    /// `F`: the formula does not hold.
    Denied,
}

impl Sign {
    pub fn is_affirmed(self) -> bool {
        self == Sign::Affirmed
    }

    pub fn flip(self) -> Sign {
        match self {
            Sign::Affirmed => Sign::Denied,
            Sign::Denied => Sign::Affirmed,
        }
    }
}

impl From<bool> for Sign {
    fn from(value: bool) -> Self {
        if value {
            Sign::Affirmed
        } else {
            Sign::Denied
        }
    }
}

impl From<Sign> for bool {
    fn from(sign: Sign) -> Self {
        sign.is_affirmed()
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Affirmed => write!(f, "T"),
            Sign::Denied => write!(f, "F"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeId(s.trim_start_matches('#').parse()?))
    }
}

/// The rule application that produced a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Derivation {
    pub rule: RuleKind,
    pub source: NodeId,
}

#[derive(Clone, Debug)]
pub struct ProofNode {
    sign: Sign,
    formula: Option<Term>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    position: usize,
    is_goal: bool,
    is_closed: bool,
    closing_substitution: Option<Substitution>,
    introduced_free_variable: Option<String>,
    derivation: Option<Derivation>,
}

impl ProofNode {
    fn formula_node(sign: Sign, formula: Term) -> Self {
        Self {
            sign,
            formula: Some(formula),
            children: vec![],
            parent: None,
            position: 0,
            is_goal: false,
            is_closed: false,
            closing_substitution: None,
            introduced_free_variable: None,
            derivation: None,
        }
    }

    fn goal() -> Self {
        Self {
            sign: Sign::Denied,
            formula: None,
            children: vec![],
            parent: None,
            position: 0,
            is_goal: true,
            is_closed: false,
            closing_substitution: None,
            introduced_free_variable: None,
            derivation: None,
        }
    }

    fn from_fragment(fragment: Fragment, derivation: Derivation) -> Self {
        Self {
            introduced_free_variable: fragment.free_variable,
            derivation: Some(derivation),
            ..Self::formula_node(fragment.sign, fragment.formula)
        }
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// `None` exactly for goals.
    pub fn formula(&self) -> Option<&Term> {
        self.formula.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Index of this node in its parent's child list.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_goal(&self) -> bool {
        self.is_goal
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn is_open_goal(&self) -> bool {
        self.is_goal && !self.is_closed
    }

    pub fn closing_substitution(&self) -> Option<&Substitution> {
        self.closing_substitution.as_ref()
    }

    pub fn introduced_free_variable(&self) -> Option<&str> {
        self.introduced_free_variable.as_deref()
    }

    pub fn derivation(&self) -> Option<Derivation> {
        self.derivation
    }
}

#[derive(Clone, Debug)]
pub struct ProofTree {
    nodes: Vec<ProofNode>,
    root: NodeId,
}

impl ProofTree {
    /// A tree holding `(sign, formula)` at the root with one open goal below it.
    pub fn new(sign: Sign, formula: Term) -> Self {
        let mut tree = Self {
            nodes: vec![ProofNode::formula_node(sign, formula)],
            root: NodeId(0),
        };
        tree.push_child(tree.root, ProofNode::goal());
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Result<&ProofNode, ProverError> {
        self.nodes.get(id.0).ok_or(ProverError::UnknownNode(id))
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent_of(id), move |&n| self.parent_of(n))
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// `id` followed by its ancestors.
    fn branch(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(id).chain(self.ancestors(id))
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|n| n == ancestor)
    }

    /// `id` and everything below it, in pre-order (left to right).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = vec![];
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.nodes.get(cur.0) else {
                continue;
            };
            found.push(cur);
            stack.extend(node.children.iter().rev());
        }
        found
    }

    /// `id` itself if it holds a formula, otherwise its nearest ancestor that does.
    pub fn nearest_formula(&self, id: NodeId) -> Option<NodeId> {
        self.branch(id)
            .find(|n| self.nodes.get(n.0).is_some_and(|node| node.formula.is_some()))
    }

    /// Free variables introduced on the branch ending at `id`, nearest first.
    pub fn free_variables(&self, id: NodeId) -> Vec<String> {
        self.branch(id)
            .filter_map(|n| self.nodes.get(n.0)?.introduced_free_variable.clone())
            .collect()
    }

    /// Deepest node that is `a` or one of its ancestors, and `b` or one of its
    /// ancestors.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let line: Vec<NodeId> = self.branch(a).collect();
        self.branch(b).find(|n| line.contains(n))
    }

    /// Whether some node strictly between `goal` and `source` was produced
    /// by expanding `source`.
    pub fn is_expanded_on_branch(&self, source: NodeId, goal: NodeId) -> bool {
        self.ancestors(goal)
            .take_while(|&n| n != source)
            .any(|n| self.nodes[n.0].derivation.is_some_and(|d| d.source == source))
    }

    /// Every goal in the tree, open or closed, left to right.
    pub fn goals(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.nodes[n.0].is_goal)
            .collect()
    }

    pub fn open_goals(&self) -> Vec<NodeId> {
        self.open_goals_under(self.root)
    }

    pub fn open_goals_under(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.nodes[n.0].is_open_goal())
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.open_goals().is_empty()
    }

    fn alloc(&mut self, node: ProofNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, mut node: ProofNode) -> NodeId {
        node.parent = Some(parent);
        node.position = index;
        let id = self.alloc(node);
        self.nodes[parent.0].children.insert(index, id);
        let shifted: Vec<NodeId> = self.nodes[parent.0].children[index + 1..].to_vec();
        for sibling in shifted {
            self.nodes[sibling.0].position += 1;
        }
        id
    }

    fn push_child(&mut self, parent: NodeId, node: ProofNode) -> NodeId {
        let index = self.nodes[parent.0].children.len();
        self.insert_child(parent, index, node)
    }

    fn append_goal(&mut self, parent: NodeId) -> NodeId {
        self.push_child(parent, ProofNode::goal())
    }

    /// Turn the goal node into a formula node, keeping its place in the tree.
    fn fill_goal(&mut self, goal: NodeId, fragment: Fragment, derivation: Derivation) {
        let slot = &mut self.nodes[goal.0];
        let replacement = ProofNode {
            parent: slot.parent,
            position: slot.position,
            ..ProofNode::from_fragment(fragment, derivation)
        };
        *slot = replacement;
    }

    /// Attach `expansion` in place of the open goal `goal` and return the new
    /// goals. The caller validates that `goal` is an open goal.
    pub(crate) fn expand(
        &mut self,
        goal: NodeId,
        expansion: Expansion,
        derivation: Derivation,
    ) -> Result<Vec<NodeId>, ProverError> {
        match expansion {
            Expansion::Linear(fragments) => {
                let mut fragments = fragments.into_iter();
                let Some(first) = fragments.next() else {
                    return Err(ProverError::Invariant(format!(
                        "{} produced no fragments",
                        derivation.rule
                    )));
                };
                self.fill_goal(goal, first, derivation);
                let mut last = goal;
                for fragment in fragments {
                    last = self.push_child(last, ProofNode::from_fragment(fragment, derivation));
                }
                Ok(vec![self.append_goal(last)])
            }
            Expansion::Branching(left, right) => {
                let Some(parent) = self.nodes[goal.0].parent else {
                    return Err(ProverError::Invariant(format!("goal {} has no parent", goal)));
                };
                let position = self.nodes[goal.0].position;
                self.fill_goal(goal, left, derivation);
                let sibling = self.insert_child(
                    parent,
                    position + 1,
                    ProofNode::from_fragment(right, derivation),
                );
                Ok(vec![self.append_goal(goal), self.append_goal(sibling)])
            }
        }
    }

    pub(crate) fn close_goals(&mut self, goals: &[NodeId], substitution: &Substitution) {
        for goal in goals {
            let node = &mut self.nodes[goal.0];
            node.is_closed = true;
            node.closing_substitution = Some(substitution.clone());
        }
    }

    /// Verify the structural invariants: consistent parent and position
    /// links, goals are formula-less leaves, every branch ends in a goal and
    /// every node is reachable from the root.
    pub fn check_invariants(&self) -> Result<(), ProverError> {
        let violation = |message: String| {
            log::error!("proof tree invariant violated: {}", message);
            Err(ProverError::Invariant(message))
        };
        let reachable = self.descendants(self.root);
        if reachable.len() != self.nodes.len() {
            return violation(format!(
                "{} nodes reachable from the root, {} allocated",
                reachable.len(),
                self.nodes.len()
            ));
        }
        if self.nodes[self.root.0].parent.is_some() {
            return violation("root has a parent".to_string());
        }
        for id in reachable {
            let node = &self.nodes[id.0];
            for (index, child) in node.children.iter().enumerate() {
                let child_node = self.node(*child)?;
                if child_node.parent != Some(id) || child_node.position != index {
                    return violation(format!(
                        "node {} is child {} of {} but links to {:?} at {}",
                        child, index, id, child_node.parent, child_node.position
                    ));
                }
            }
            if node.formula.is_none() && !(node.is_goal && node.children.is_empty()) {
                return violation(format!("node {} has no formula but is not a goal leaf", id));
            }
            if node.formula.is_some() && (node.is_goal || node.children.is_empty()) {
                return violation(format!("formula node {} is a goal or a leaf", id));
            }
            if node.is_closed && !node.is_goal {
                return violation(format!("node {} is closed but not a goal", id));
            }
        }
        Ok(())
    }
}

impl Index<NodeId> for ProofTree {
    type Output = ProofNode;

    /// Panics if `id` does not belong to this tree; see [`ProofTree::node`].
    fn index(&self, id: NodeId) -> &ProofNode {
        &self.nodes[id.0]
    }
}
