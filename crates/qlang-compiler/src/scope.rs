//! Lexical scope tree.
//!
//! Uses `petgraph::StableDiGraph` with:
//! - Nodes: [`ScopeData`] (symbol map plus ordered variable list)
//! - Edges: parent → child, one incoming edge per non-root scope
//!
//! The root is the package-global scope shared by every file. Block scopes
//! are added when a function body or nested block is entered and removed
//! when it is left; stable indices keep the ids of live scopes valid across
//! removals.

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use qlang_core::DataType;
use rustc_hash::FxHashMap;

use crate::symbol::{Symbol, Var, VarAddr};

/// Handle to a live scope in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(NodeIndex);

/// Bindings owned by one scope.
#[derive(Debug, Default)]
pub struct ScopeData<'ast> {
    syms: FxHashMap<&'ast str, Symbol<'ast>>,
    vars: Vec<Var<'ast>>,
}

impl<'ast> ScopeData<'ast> {
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Symbol<'ast>> {
        self.syms.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.syms.contains_key(name)
    }

    /// Bind `name`, returning any previous binding.
    pub fn insert(&mut self, name: &'ast str, sym: Symbol<'ast>) -> Option<Symbol<'ast>> {
        self.syms.insert(name, sym)
    }

    /// Append a variable at the next free slot and bind it.
    pub fn push_var(&mut self, name: &'ast str, data_type: DataType, depth: u32) -> Var<'ast> {
        let var = Var {
            name,
            data_type,
            addr: VarAddr {
                depth,
                slot: self.vars.len() as u32,
            },
        };
        self.syms.insert(name, Symbol::Var(var));
        self.vars.push(var);
        var
    }

    /// Variables in declaration order.
    pub fn vars(&self) -> &[Var<'ast>] {
        &self.vars
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&'ast str, Symbol<'ast>)> + '_ {
        self.syms.iter().map(|(n, s)| (*n, *s))
    }

    pub fn len(&self) -> usize {
        self.syms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syms.is_empty()
    }

    pub(crate) fn into_parts(self) -> (FxHashMap<&'ast str, Symbol<'ast>>, Vec<Var<'ast>>) {
        (self.syms, self.vars)
    }
}

/// Tree of lexical scopes rooted at the package scope.
#[derive(Debug)]
pub struct ScopeTree<'ast> {
    graph: StableDiGraph<ScopeData<'ast>, ()>,
    root: NodeIndex,
}

impl<'ast> ScopeTree<'ast> {
    /// Create a tree holding only the package scope.
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(ScopeData::default());
        Self { graph, root }
    }

    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId(self.root)
    }

    #[inline]
    pub fn is_root(&self, id: ScopeId) -> bool {
        id.0 == self.root
    }

    /// Open a child scope of `parent`.
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let child = self.graph.add_node(ScopeData::default());
        self.graph.add_edge(parent.0, child, ());
        ScopeId(child)
    }

    /// Close a scope, returning its bindings. The root cannot be closed.
    pub fn pop(&mut self, id: ScopeId) -> Option<ScopeData<'ast>> {
        if self.is_root(id) {
            return None;
        }
        self.graph.remove_node(id.0)
    }

    /// The enclosing scope, None for the root.
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.graph
            .neighbors_directed(id.0, Direction::Incoming)
            .next()
            .map(ScopeId)
    }

    /// `id` followed by each enclosing scope out to the root.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |s| self.parent(*s))
    }

    #[inline]
    pub fn get(&self, id: ScopeId) -> &ScopeData<'ast> {
        &self.graph[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ScopeId) -> &mut ScopeData<'ast> {
        &mut self.graph[id.0]
    }

    /// Innermost binding of `name` visible from `id`.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<Symbol<'ast>> {
        self.ancestors(id).find_map(|s| self.get(s).lookup(name))
    }

    /// Number of live scopes, the root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Consume the tree, keeping only the package scope.
    pub fn into_root(mut self) -> ScopeData<'ast> {
        self.graph.remove_node(self.root).unwrap_or_default()
    }
}

impl Default for ScopeTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::FuncId;
    use qlang_core::primitives;

    fn int() -> DataType {
        DataType::simple(primitives::INT)
    }

    #[test]
    fn slots_count_from_zero_per_scope() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let a = tree.get_mut(root).push_var("a", int(), 0);
        let b = tree.get_mut(root).push_var("b", int(), 0);
        assert_eq!(a.addr, VarAddr { depth: 0, slot: 0 });
        assert_eq!(b.addr, VarAddr { depth: 0, slot: 1 });

        let child = tree.push(root);
        let c = tree.get_mut(child).push_var("c", int(), 1);
        assert_eq!(c.addr, VarAddr { depth: 1, slot: 0 });
    }

    #[test]
    fn sibling_scopes_have_independent_counters() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let first = tree.push(root);
        tree.get_mut(first).push_var("x", int(), 1);
        tree.get_mut(first).push_var("y", int(), 1);
        tree.pop(first);

        let second = tree.push(root);
        let z = tree.get_mut(second).push_var("z", int(), 1);
        assert_eq!(z.addr.slot, 0);
    }

    #[test]
    fn lookup_prefers_innermost() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.get_mut(root).push_var("x", int(), 0);
        let inner = tree.push(root);
        let shadow = tree.get_mut(inner).push_var("x", DataType::named("string"), 1);

        assert_eq!(tree.lookup(inner, "x"), Some(Symbol::Var(shadow)));
        let Some(Symbol::Var(outer)) = tree.lookup(root, "x") else {
            panic!("expected outer variable");
        };
        assert_eq!(outer.data_type, int());
    }

    #[test]
    fn parent_chain() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let a = tree.push(root);
        let b = tree.push(a);
        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![b, a, root]);
    }

    #[test]
    fn pop_removes_scope_but_not_root() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let child = tree.push(root);
        tree.get_mut(child).insert("f", Symbol::Func(FuncId::new(0)));
        assert_eq!(tree.len(), 2);

        let data = tree.pop(child).unwrap();
        assert!(data.contains("f"));
        assert_eq!(tree.len(), 1);
        assert!(tree.pop(root).is_none());
    }

    #[test]
    fn into_root_keeps_package_bindings() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.get_mut(root).insert("main", Symbol::Func(FuncId::new(0)));
        let _block = tree.push(root);
        let data = tree.into_root();
        assert_eq!(data.lookup("main"), Some(Symbol::Func(FuncId::new(0))));
    }
}
