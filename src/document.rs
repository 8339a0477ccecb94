//! operation documents
//!
//! wraps each root field's synthesized selection into a complete operation
//! with its variable signature. [`Generator`] runs this for every field of
//! every root operation type.

use crate::arguments::render_signature;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::schema::{ArgumentDefinition, OperationKind, TypeGraph, TypeKind};
use crate::synth::Synthesizer;
use indexmap::IndexMap;

/// synthesized operation for one root field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDocument {
    pub kind: OperationKind,
    /// root field name, also used as the operation name
    pub name: String,
    /// full operation text
    pub text: String,
    /// variable name to argument, in binding order
    pub variables: IndexMap<String, ArgumentDefinition>,
    /// true if the root field itself declares arguments
    pub has_arguments: bool,
}

impl OperationDocument {
    /// variable name to canonical type text, in binding order
    pub fn variable_types(&self) -> IndexMap<String, String> {
        self.variables
            .iter()
            .map(|(variable, arg)| (variable.clone(), arg.type_text()))
            .collect()
    }
}

/// render `<keyword> <name>(<signature>) {\n<body>\n}`
///
/// the parenthesised signature is left out when there are no variables.
pub fn assemble(
    kind: OperationKind,
    name: &str,
    body: &str,
    variables: &IndexMap<String, ArgumentDefinition>,
) -> String {
    let signature = render_signature(variables);
    if signature.is_empty() {
        format!("{kind} {name} {{\n{body}\n}}")
    } else {
        format!("{kind} {name}({signature}) {{\n{body}\n}}")
    }
}

/// synthesizes operation documents from a type graph
#[derive(Debug, Clone)]
pub struct Generator<'g> {
    graph: &'g TypeGraph,
    config: GeneratorConfig,
}

impl<'g> Generator<'g> {
    /// create a generator; fails if the configuration is invalid
    pub fn new(graph: &'g TypeGraph, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// documents for every root field of every available root type
    pub fn documents(&self) -> Vec<OperationDocument> {
        OperationKind::ALL
            .into_iter()
            .flat_map(|kind| self.documents_for(kind))
            .collect()
    }

    /// documents for every root field of one root type, in declaration order
    ///
    /// a missing root type yields no documents.
    pub fn documents_for(&self, kind: OperationKind) -> Vec<OperationDocument> {
        let Some(root) = self.graph.root_type_name(kind) else {
            tracing::info!("schema has no {kind} type, skipping {}", kind.directory());
            return Vec::new();
        };
        let fields = match self.graph.get(root) {
            Some(ty) if ty.kind == TypeKind::Object => &ty.fields,
            other => {
                let found = other
                    .map_or_else(|| "undefined".to_string(), |ty| ty.kind.to_string());
                tracing::warn!(
                    "{kind} root type {root} is not an object type ({found}), skipping"
                );
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for field in fields {
            if !self.config.include_deprecated_fields && field.is_deprecated() {
                tracing::debug!("skipping deprecated {kind} field {}", field.name);
                continue;
            }

            let Some(synthesized) =
                Synthesizer::new(self.graph, &self.config).synthesize_root(root, field)
            else {
                tracing::debug!(
                    "{kind} field {} has no selectable fields within depth {}, skipping",
                    field.name,
                    self.config.depth_limit
                );
                continue;
            };

            let variables = synthesized.arguments.into_variables();
            let text = assemble(kind, &field.name, &synthesized.body, &variables);
            documents.push(OperationDocument {
                kind,
                name: field.name.clone(),
                text,
                variables,
                has_arguments: !field.arguments.is_empty(),
            });
        }

        tracing::debug!("synthesized {} {kind} documents", documents.len());
        documents
    }
}
