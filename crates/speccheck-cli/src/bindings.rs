// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `name=path` bindings installed before the first block runs.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use speccheck_ast::LineMap;
use speccheck_interp::{from_json, Interpreter, RuntimeError, Scope, Value};
use tracing::debug;

/// A requested binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub locator: String,
}

impl Binding {
    /// Parse `name=locator`. Splits on the first `=`.
    pub fn parse(arg: &str) -> Result<Binding> {
        let Some((name, locator)) = arg.split_once('=') else {
            bail!("binding `{}` is not of the form name=path", arg);
        };
        if !is_identifier(name) {
            bail!("binding name `{}` is not an identifier", name);
        }
        if locator.is_empty() {
            bail!("binding `{}` has no path", name);
        }
        Ok(Binding { name: name.to_string(), locator: locator.to_string() })
    }

    /// Load the value: JSON files are parsed, anything else is evaluated
    /// as a script in a fresh scope and yields the script's value.
    pub fn load(&self) -> Result<Value> {
        let path = Path::new(&self.locator);
        let text = fs::read_to_string(path).with_context(|| format!("reading binding `{}` from {}", self.name, path.display()))?;

        let value = if path.extension().is_some_and(|ext| ext == "json") {
            let json: serde_json::Value =
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
            from_json(&json)
        } else {
            let program = match speccheck_parser::parse_source(&text) {
                Ok(program) => program,
                Err(err) => {
                    let (line, col) = LineMap::new(&text).line_col(err.span.start);
                    bail!("{}:{}:{}: SyntaxError: {}", path.display(), line, col, err.message);
                }
            };
            let scope = Scope::new();
            Interpreter::new()
                .eval_program(&program, &scope)
                .map_err(|raised| anyhow::anyhow!("evaluating {}: {}", path.display(), RuntimeError::Thrown(raised)))?
        };
        debug!(name = %self.name, locator = %self.locator, "loaded binding");
        Ok(value)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
