//! Graph export command

use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::{Args, ValueEnum};

use crate::{AppContext, Cli};
use trackplan_core::{DefinitionGraph, Node};

/// Export format
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    #[value(name = "graphml")]
    GraphML,
    Dot,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(short = 't', long = "to", default_value = "json")]
    pub to: ExportFormat,
}

pub async fn run(args: &ExportArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Exporting graph");

    let graph = ctx.graph().await?;
    tracing::debug!(
        "Exporting {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let content = match args.to {
        ExportFormat::Json => serde_json::to_string_pretty(&graph)?,
        ExportFormat::Csv => export_to_csv(&graph),
        ExportFormat::GraphML => export_to_graphml(&graph),
        ExportFormat::Dot => export_to_dot(&graph),
    };

    if let Some(ref path) = args.output {
        #[cfg(unix)]
        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o644)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        {
            std::fs::write(path, &content)?;
        }
        if !cli.quiet {
            println!("Exported to {:?}", path);
        }
    } else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

/// Display name of a node's type column
fn node_type(node: &Node) -> &str {
    match node {
        Node::Parameter(p) => &p.param_type,
        Node::Event(_) => "",
    }
}

fn node_description(node: &Node) -> &str {
    match node {
        Node::Parameter(p) => &p.description,
        Node::Event(e) => &e.description,
    }
}

fn export_to_csv(graph: &DefinitionGraph) -> String {
    let mut output = String::new();

    output.push_str("# Nodes\n");
    output.push_str("name,kind,type,description\n");
    for node in graph.nodes() {
        output.push_str(&format!(
            "{},{},{},{}\n",
            csv_escape(node.name()),
            node.kind(),
            csv_escape(node_type(node)),
            csv_escape(node_description(node))
        ));
    }

    output.push_str("\n# Edges\n");
    output.push_str("event,parameter\n");
    for edge in graph.edges() {
        output.push_str(&format!("{},{}\n", csv_escape(&edge.from), csv_escape(&edge.to)));
    }

    output
}

/// Escape a string for CSV output with formula injection protection
fn csv_escape(s: &str) -> String {
    // Prefix dangerous chars with ' to prevent spreadsheet interpretation
    let needs_formula_protection = s
        .chars()
        .next()
        .map(|c| matches!(c, '=' | '+' | '-' | '@' | '\t' | '\r'))
        .unwrap_or(false);

    let escaped = if needs_formula_protection {
        format!("'{}", s)
    } else {
        s.to_string()
    };

    if escaped.contains(',') || escaped.contains('"') || escaped.contains('\n') {
        format!("\"{}\"", escaped.replace('"', "\"\""))
    } else {
        escaped
    }
}

fn export_to_graphml(graph: &DefinitionGraph) -> String {
    let mut xml = String::new();

    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns
         http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
  <key id="d0" for="node" attr.name="kind" attr.type="string"/>
  <key id="d1" for="node" attr.name="type" attr.type="string"/>
  <key id="d2" for="node" attr.name="description" attr.type="string"/>
  <graph id="definitions" edgedefault="directed">
"#,
    );

    for node in graph.nodes() {
        xml.push_str(&format!(
            "    <node id=\"{}\">\n      <data key=\"d0\">{}</data>\n      <data key=\"d1\">{}</data>\n      <data key=\"d2\">{}</data>\n    </node>\n",
            xml_escape(&node_id(node)),
            node.kind(),
            xml_escape(node_type(node)),
            xml_escape(node_description(node))
        ));
    }

    for (i, edge) in graph.edges().iter().enumerate() {
        xml.push_str(&format!(
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\"/>\n",
            i,
            xml_escape(&format!("event:{}", edge.from)),
            xml_escape(&format!("parameter:{}", edge.to))
        ));
    }

    xml.push_str("  </graph>\n</graphml>\n");
    xml
}

fn export_to_dot(graph: &DefinitionGraph) -> String {
    let mut dot = String::from("digraph definitions {\n");

    for node in graph.nodes() {
        let shape = match node {
            Node::Parameter(_) => "ellipse",
            Node::Event(_) => "box",
        };
        dot.push_str(&format!(
            "  \"{}\" [label=\"{}\", shape={}];\n",
            dot_escape(&node_id(node)),
            dot_escape(node.name()),
            shape
        ));
    }
    for edge in graph.edges() {
        dot.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            dot_escape(&format!("event:{}", edge.from)),
            dot_escape(&format!("parameter:{}", edge.to))
        ));
    }

    dot.push_str("}\n");
    dot
}

/// Node ids carry the kind so a parameter and event sharing a name stay distinct
fn node_id(node: &Node) -> String {
    format!("{}:{}", node.kind(), node.name())
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
