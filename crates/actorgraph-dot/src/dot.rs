//! Minimal DOT writer.
//!
//! Identifiers and labels are written verbatim, without quoting. Actor and
//! message names are already bare tokens, and downstream tooling expects
//! exactly this shape.

use std::fmt::Write;

pub struct DotBuilder {
    output: String,
}

impl DotBuilder {
    /// Start a digraph with a quoted name.
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(1024);
        let _ = writeln!(output, "digraph \"{name}\" {{");
        Self { output }
    }

    /// Add a bare `key=value` graph attribute.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        let _ = writeln!(self.output, "{key}={value}");
        self
    }

    pub fn node(&mut self, id: &str, label: &str) -> &mut Self {
        let _ = writeln!(self.output, "{id} [label={label}]");
        self
    }

    pub fn edge(&mut self, from: &str, to: &str, label: &str) -> &mut Self {
        let _ = writeln!(self.output, "{from} -> {to} [label={label}]");
        self
    }

    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}
