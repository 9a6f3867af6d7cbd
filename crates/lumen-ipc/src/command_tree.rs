//! N-ary command dispatch tree.
//!
//! The CLI registers a fixed forest of named commands under an anonymous
//! root, then resolves `argv` through it: greedy descent, first name-equal
//! child in sibling order, no backtracking. Whatever suffix of the argument
//! vector is left unconsumed becomes the resolved node's trailing arguments.
//! Resolution never fails: an unknown subcommand falls back to the deepest
//! matched ancestor, which is expected to print usage help.

use snafu::{Snafu, ensure};

#[derive(Snafu, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[snafu(display("command name may not be empty"))]
    EmptyName,
}

/// A named, executable unit in the dispatch hierarchy.
///
/// `A` is whatever the caller dispatches on once a node is resolved; the
/// tree itself only cares about names. Children are owned in insertion
/// order, which doubles as sibling priority: duplicate sibling names are
/// not checked, the first lexical match wins.
#[derive(Debug)]
pub struct CommandNode<A> {
    name: String,
    action: A,
    children: Vec<CommandNode<A>>,
}

/// Result of resolving an argument vector against a tree.
#[derive(Debug)]
pub struct Resolution<'t, 'v, A> {
    /// Deepest node whose path matched a prefix of the input.
    pub node: &'t CommandNode<A>,
    /// How many input words the match consumed.
    pub depth: usize,
    /// The unconsumed suffix, handed verbatim to the node's action.
    pub trailing: &'v [String],
}

impl<A> CommandNode<A> {
    /// Anonymous root. Matches when the input is empty (or nothing else does).
    pub fn root(action: A) -> Self {
        Self {
            name: String::new(),
            action,
            children: Vec::new(),
        }
    }

    pub fn new(name: impl Into<String>, action: A) -> Result<Self, TreeError> {
        let name = name.into();
        ensure!(!name.is_empty(), EmptyNameSnafu);
        Ok(Self {
            name,
            action,
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn children(&self) -> &[CommandNode<A>] {
        &self.children
    }

    /// Append `child` as the new last sibling under this node.
    pub fn add_child(&mut self, child: CommandNode<A>) {
        self.children.push(child);
    }

    /// Builder-style [`add_child`](Self::add_child).
    #[must_use]
    pub fn with_child(mut self, child: CommandNode<A>) -> Self {
        self.children.push(child);
        self
    }

    /// Resolve `argv` to the deepest matching node.
    ///
    /// Pure function of (tree, vector): walks down from `self`, consuming
    /// one word per matched child, and stops at the first word no child
    /// name equals. A wrong turn is never undone.
    pub fn resolve<'t, 'v>(&'t self, argv: &'v [String]) -> Resolution<'t, 'v, A> {
        let mut node = self;
        let mut depth = 0;
        for word in argv {
            match node.children.iter().find(|c| c.name == *word) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }
        Resolution {
            node,
            depth,
            trailing: &argv[depth..],
        }
    }
}
