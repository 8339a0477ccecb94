//! argument collection
//!
//! maps every field argument used in one root-field document to a unique
//! variable name. the first use of a name keeps it bare; later uses get
//! `name1`, `name2`, ... in order of appearance.

use crate::schema::ArgumentDefinition;
use indexmap::IndexMap;
use std::collections::HashMap;

/// restore point for [`ArgumentCollector::rollback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    bindings: usize,
    undo: usize,
}

/// variable bindings for one root-field document
#[derive(Debug, Clone, Default)]
pub struct ArgumentCollector {
    bindings: IndexMap<String, ArgumentDefinition>,
    duplicate_counts: HashMap<String, usize>,
    // previous duplicate count for every suffixed binding, newest last
    undo: Vec<(String, Option<usize>)>,
}

impl ArgumentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// bind each argument to a fresh variable name, returned in argument order
    pub fn bind(&mut self, arguments: &[ArgumentDefinition]) -> Vec<String> {
        arguments
            .iter()
            .map(|arg| {
                let variable = self.next_variable(&arg.name);
                self.bindings.insert(variable.clone(), arg.clone());
                variable
            })
            .collect()
    }

    fn next_variable(&mut self, name: &str) -> String {
        let previous = self.duplicate_counts.get(name).copied();
        let mut count = match previous {
            Some(count) => count + 1,
            None if self.bindings.contains_key(name) => 1,
            None => return name.to_string(),
        };

        let mut variable = format!("{name}{count}");
        // a schema argument may literally be called `id1`
        while self.bindings.contains_key(&variable) {
            count += 1;
            variable = format!("{name}{count}");
        }

        self.undo.push((name.to_string(), previous));
        self.duplicate_counts.insert(name.to_string(), count);
        variable
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            bindings: self.bindings.len(),
            undo: self.undo.len(),
        }
    }

    /// forget every binding made since `checkpoint`
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.bindings.truncate(checkpoint.bindings);
        while self.undo.len() > checkpoint.undo {
            let Some((name, previous)) = self.undo.pop() else {
                break;
            };
            match previous {
                Some(count) => self.duplicate_counts.insert(name, count),
                None => self.duplicate_counts.remove(&name),
            };
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// variable name to argument, in binding order
    pub fn variables(&self) -> &IndexMap<String, ArgumentDefinition> {
        &self.bindings
    }

    pub fn into_variables(self) -> IndexMap<String, ArgumentDefinition> {
        self.bindings
    }

    /// `$name: Type` pairs joined for an operation signature
    pub fn signature(&self) -> String {
        render_signature(&self.bindings)
    }
}

/// render `$var: Type, ...` in insertion order
pub fn render_signature(variables: &IndexMap<String, ArgumentDefinition>) -> String {
    variables
        .iter()
        .map(|(variable, arg)| format!("${variable}: {}", arg.ty))
        .collect::<Vec<_>>()
        .join(", ")
}
