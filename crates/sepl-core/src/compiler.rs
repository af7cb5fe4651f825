//! Script compilation: sections, declarations, then statements.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info_span};

use crate::declare::{clauses, parse_declarations};
use crate::error::SeplError;
use crate::factory::build_statement;
use crate::section::{split_sections, BEGIN, DECLARE, END};
use crate::statement::Statement;
use crate::tokenizer::tokenize_clause;
use crate::variables::VariableStore;

/// A script ready to execute: its variable store and its statements in
/// source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledScript {
    variables: VariableStore,
    /// The store as DECLARE left it, before any statement ran.
    #[serde(skip)]
    declared: VariableStore,
    statements: Vec<Statement>,
}

impl CompiledScript {
    /// Compiles SEPL source text.
    ///
    /// The first malformed section, declaration or statement aborts
    /// compilation; no partial script is returned.
    pub fn compile(source: &str) -> Result<Self, SeplError> {
        let _span = info_span!("compile", bytes = source.len()).entered();

        let sections = split_sections(source)?;
        let mut variables = VariableStore::new();
        parse_declarations(&sections.declare, &mut variables)?;

        let mut statements = Vec::new();
        let mut buf = String::new();
        for (i, clause) in clauses(&sections.procedure, &mut buf).enumerate() {
            let index = i + 1;
            let statement = tokenize_clause(clause)
                .and_then(|tokens| build_statement(&tokens, &variables))
                .map_err(|source| SeplError::Statement {
                    index,
                    clause: clause.to_string(),
                    source,
                })?;
            statements.push(statement);
        }

        debug!(
            variables = variables.len(),
            statements = statements.len(),
            "compiled script"
        );
        Ok(Self { declared: variables.clone(), variables, statements })
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn into_variables(self) -> VariableStore {
        self.variables
    }

    /// Borrows the statements and the store at the same time, so results can
    /// be written back while iterating.
    pub(crate) fn parts_mut(&mut self) -> (&[Statement], &mut VariableStore) {
        (&self.statements, &mut self.variables)
    }
}

impl fmt::Display for CompiledScript {
    /// Renders the script back to SEPL source. Variable references render as
    /// `$name` and durations in milliseconds. The DECLARE block shows the
    /// declared initial values, not values written by an execution.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.declared.is_empty() {
            writeln!(f, "{}", DECLARE)?;
            for (name, value) in self.declared.iter() {
                if value.is_empty() {
                    writeln!(f, "    {};", name)?;
                } else {
                    writeln!(f, "    {} := \"{}\";", name, value)?;
                }
            }
            writeln!(f, "{}", END)?;
        }
        writeln!(f, "{}", BEGIN)?;
        for statement in &self.statements {
            writeln!(f, "    {};", statement)?;
        }
        writeln!(f, "{}", END)
    }
}
