//! Show command: one definition and its references

use clap::Args;
use serde_json::json;

use crate::output::{to_json, OutputFormat};
use crate::{AppContext, Cli};
use trackplan_core::{DefinitionGraph, Node};

#[derive(Args)]
pub struct ShowArgs {
    /// Parameter or event name
    pub name: String,
}

pub async fn run(args: &ShowArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let graph = ctx.graph().await?;

    let nodes = matching_nodes(&graph, &args.name);
    if nodes.is_empty() {
        anyhow::bail!("No parameter or event named '{}'", args.name);
    }

    for node in nodes {
        match cli.output_format() {
            OutputFormat::Json => println!("{}", to_json(&describe_json(&graph, node))),
            OutputFormat::Table => print!("{}", describe(&graph, node)),
        }
    }
    Ok(())
}

/// Both nodes when a parameter and an event share the name
fn matching_nodes<'a>(graph: &'a DefinitionGraph, name: &str) -> Vec<&'a Node> {
    graph.nodes().iter().filter(|n| n.name() == name).collect()
}

fn describe_json(graph: &DefinitionGraph, node: &Node) -> serde_json::Value {
    match node {
        Node::Parameter(p) => json!({
            "node": node,
            "used_by": graph.incoming(&p.name),
        }),
        Node::Event(e) => json!({
            "node": node,
            "uses": graph.outgoing(&e.name),
        }),
    }
}

fn describe(graph: &DefinitionGraph, node: &Node) -> String {
    let mut out = String::new();
    match node {
        Node::Parameter(p) => {
            out.push_str(&format!("Parameter: {}\n", p.name));
            out.push_str(&format!("  Type: {}\n", p.param_type));
            if !p.description.is_empty() {
                out.push_str(&format!("  Description: {}\n", p.description));
            }
            if !p.example.is_empty() {
                out.push_str(&format!("  Example: {}\n", p.example));
            }
            if let Some(rule) = &p.validation {
                out.push_str(&format!("  Validation: {}\n", rule));
            }
            let used_by = graph.incoming(&p.name);
            if used_by.is_empty() {
                out.push_str("  Used by: (none)\n");
            } else {
                out.push_str("  Used by:\n");
                for event in used_by {
                    out.push_str(&format!("    - {}\n", event));
                }
            }
        }
        Node::Event(e) => {
            out.push_str(&format!("Event: {}\n", e.name));
            if !e.description.is_empty() {
                out.push_str(&format!("  Description: {}\n", e.description));
            }
            for screenshot in &e.screenshots {
                out.push_str(&format!("  Screenshot: {}\n", screenshot));
            }
            let uses = graph.outgoing(&e.name);
            if uses.is_empty() {
                out.push_str("  Uses: (none)\n");
            } else {
                out.push_str("  Uses:\n");
                for param in uses {
                    out.push_str(&format!("    - {}\n", param));
                }
            }
        }
    }
    out
}
