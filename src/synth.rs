//! query synthesis
//!
//! walks the type graph depth-first from one root field and renders the full
//! selection tree. composite fields are pruned past the depth limit or when
//! their (parent type, field) edge was already entered; a composite field
//! left without children is dropped. unions expand into one inline fragment
//! per member type.

use crate::arguments::ArgumentCollector;
use crate::config::GeneratorConfig;
use crate::schema::{FieldDefinition, Shape, TypeGraph};
use std::collections::HashSet;

const INDENT: &str = "    ";

/// (parent type, field) pair entered during a traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub parent: String,
    pub field: String,
}

impl Edge {
    pub fn new(parent: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            field: field.into(),
        }
    }
}

/// composite edges entered outside union expansions; never shrinks
#[derive(Debug, Clone, Default)]
pub struct CycleGuard {
    entered: HashSet<Edge>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.entered.contains(edge)
    }

    /// returns false if the edge was already recorded
    pub fn record(&mut self, edge: Edge) -> bool {
        self.entered.insert(edge)
    }

    pub fn len(&self) -> usize {
        self.entered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
    }
}

/// how a field was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Via {
    /// plain field selection
    Field,
    /// anywhere inside a union member's inline fragment
    Union,
}

impl Via {
    /// union expansions spend two levels on the fragment
    fn effective_depth(self, depth: usize) -> usize {
        match self {
            Via::Field => depth,
            Via::Union => depth.saturating_sub(2),
        }
    }
}

/// selection text and variables for one root field
#[derive(Debug, Clone)]
pub struct Synthesized {
    /// selection of the root field itself, indented one level
    pub body: String,
    pub arguments: ArgumentCollector,
}

/// recursive synthesizer for a single root field
///
/// holds the accumulators shared by the whole traversal; create a new one
/// for every root field.
pub struct Synthesizer<'g> {
    graph: &'g TypeGraph,
    config: &'g GeneratorConfig,
    arguments: ArgumentCollector,
    cycle_guard: CycleGuard,
}

impl<'g> Synthesizer<'g> {
    pub fn new(graph: &'g TypeGraph, config: &'g GeneratorConfig) -> Self {
        Self {
            graph,
            config,
            arguments: ArgumentCollector::new(),
            cycle_guard: CycleGuard::new(),
        }
    }

    /// synthesize `field` of the root type `root`
    ///
    /// returns `None` when every branch under a composite root field is pruned.
    pub fn synthesize_root(
        mut self,
        root: &str,
        field: &'g FieldDefinition,
    ) -> Option<Synthesized> {
        let body = self.synthesize(root, field, 1, Via::Field)?;
        Some(Synthesized {
            body,
            arguments: self.arguments,
        })
    }

    fn synthesize(
        &mut self,
        parent: &str,
        field: &'g FieldDefinition,
        depth: usize,
        via: Via,
    ) -> Option<String> {
        let graph = self.graph;
        let type_name = field.ty.named();
        let indent = INDENT.repeat(depth);

        match graph.shape(type_name) {
            Shape::Leaf => {
                let args = self.argument_clause(field);
                Some(format!("{indent}{}{args}", field.name))
            }
            Shape::Composite(children) => {
                let edge = Edge::new(parent, &field.name);
                if (!self.config.include_cross_references && self.cycle_guard.contains(&edge))
                    || via.effective_depth(depth) > self.config.depth_limit
                {
                    return None;
                }
                // members are expanded independently of each other
                if via == Via::Field {
                    self.cycle_guard.record(edge);
                }

                let checkpoint = self.arguments.checkpoint();
                let args = self.argument_clause(field);
                let block = self.selection_block(type_name, children, depth + 1, via);
                if block.is_empty() {
                    self.arguments.rollback(checkpoint);
                    return None;
                }
                Some(format!("{indent}{}{args} {{\n{block}\n{indent}}}", field.name))
            }
            Shape::Union(members) => {
                // a union sits one level below its parent composite, like a leaf
                if via.effective_depth(depth) > self.config.depth_limit + 1 {
                    return None;
                }
                let checkpoint = self.arguments.checkpoint();
                let args = self.argument_clause(field);
                let Some(block) = self.expand_union(members, depth) else {
                    self.arguments.rollback(checkpoint);
                    return None;
                };
                Some(format!("{indent}{}{args} {{\n{block}\n{indent}}}", field.name))
            }
        }
    }

    /// newline-joined selections of the non-deprecated fields of `parent`
    fn selection_block(
        &mut self,
        parent: &str,
        fields: &'g [FieldDefinition],
        depth: usize,
        via: Via,
    ) -> String {
        let include_deprecated = self.config.include_deprecated_fields;
        let mut lines = Vec::new();
        for field in fields
            .iter()
            .filter(|field| include_deprecated || !field.is_deprecated())
        {
            if let Some(text) = self.synthesize(parent, field, depth, via) {
                lines.push(text);
            }
        }
        lines.join("\n")
    }

    /// one `... on Member { ... }` fragment per member with a non-empty block
    fn expand_union(&mut self, members: &'g [String], depth: usize) -> Option<String> {
        let graph = self.graph;
        let indent = INDENT.repeat(depth + 1);
        let mut fragments = Vec::new();

        for member in members {
            let Shape::Composite(fields) = graph.shape(member) else {
                continue;
            };
            let block = self.selection_block(member, fields, depth + 2, Via::Union);
            if block.is_empty() {
                continue;
            }
            fragments.push(format!("{indent}... on {member} {{\n{block}\n{indent}}}"));
        }

        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("\n"))
        }
    }

    /// `(arg: $var, ...)` for the field's arguments, or nothing
    fn argument_clause(&mut self, field: &FieldDefinition) -> String {
        if field.arguments.is_empty() {
            return String::new();
        }

        let variables = self.arguments.bind(&field.arguments);
        let parts: Vec<String> = field
            .arguments
            .iter()
            .zip(&variables)
            .map(|(arg, variable)| format!("{}: ${variable}", arg.name))
            .collect();
        format!("({})", parts.join(", "))
    }
}
