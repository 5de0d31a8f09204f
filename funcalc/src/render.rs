//! Console renderer
//!
//! Renders the operation catalogue and the command list.

use crate::command::COMMANDS;
use funcalc_ops::OperationRegistry;

pub const PROMPT: &str = "Enter command ('help' for the list of available commands): ";

/// Catalogue and help renderer
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Numbered listing of the catalogue followed by the command prompt
    pub fn catalogue(&self, registry: &OperationRegistry) -> String {
        let mut output = format!(
            "\nList of available matrix operations ({}/{}):\n",
            registry.size(),
            registry.capacity()
        );
        for (i, op) in registry.iter() {
            output.push_str(&format!("{}. {}: {}\n", i, op.name(), op.describe()));
        }
        output.push('\n');
        output.push_str(PROMPT);
        output
    }

    pub fn help(&self) -> String {
        let width = COMMANDS.iter().map(|c| c.usage().len()).max().unwrap_or(0);
        let mut output = String::from("The available commands are:\n");
        for meta in &COMMANDS {
            output.push_str(&format!("* {:<width$} - {}\n", meta.usage(), meta.description, width = width));
        }
        output.push('\n');
        output
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
