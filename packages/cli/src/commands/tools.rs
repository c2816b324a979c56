use super::{open_session, parse_value};
use crate::config::Config;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use scene_editor::{StructureAction, ToolDescriptor, ToolKind};

#[derive(Debug, Subcommand)]
pub enum ToolsCommand {
    /// List registry tools grouped by family
    List,

    /// Register a new tool
    Add(AddToolArgs),
}

#[derive(Debug, Args)]
pub struct AddToolArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub family: String,

    /// slider, toggle, color, text or script
    #[arg(long = "type")]
    pub kind: String,

    /// Style property (style tools)
    #[arg(long)]
    pub property: Option<String>,

    /// Structural action (script tools): add-child, delete-node, duplicate-node, wrap-div
    #[arg(long)]
    pub action: Option<String>,

    #[arg(long)]
    pub unit: Option<String>,

    #[arg(long)]
    pub min: Option<f64>,

    #[arg(long)]
    pub max: Option<f64>,

    /// Default value; JSON literals are accepted, anything else is text
    #[arg(long)]
    pub default: Option<String>,

    #[arg(long)]
    pub tooltip: Option<String>,
}

impl AddToolArgs {
    fn into_descriptor(self) -> Result<ToolDescriptor> {
        let kind = match self.kind.as_str() {
            "script" => {
                let Some(action) = self.action else {
                    bail!("Script tools need --action");
                };
                let parsed: StructureAction =
                    serde_json::from_value(serde_json::Value::String(action.clone()))?;
                if parsed == StructureAction::Unsupported {
                    bail!("Unknown action: {}", action);
                }
                ToolKind::Script { action: parsed }
            }
            style => {
                let Some(property) = self.property else {
                    bail!("Style tools need --property");
                };
                let unit = self.unit;
                match style {
                    "slider" => ToolKind::Slider {
                        property,
                        unit,
                        min: self.min,
                        max: self.max,
                    },
                    "toggle" => ToolKind::Toggle { property, unit },
                    "color" => ToolKind::Color { property, unit },
                    "text" => ToolKind::Text { property, unit },
                    other => bail!("Unknown tool type: {}", other),
                }
            }
        };

        let mut tool = ToolDescriptor::new(self.name, self.family, kind);
        if let Some(default) = self.default {
            tool = tool.with_default(parse_value(&default));
        }
        if let Some(tooltip) = self.tooltip {
            tool = tool.with_tooltip(tooltip);
        }
        Ok(tool)
    }
}

pub async fn tools(command: ToolsCommand, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd);

    match command {
        ToolsCommand::List => {
            let registry = session.load_registry().await?;
            if registry.tools.is_empty() {
                println!("{}", "No tools registered".yellow());
                return Ok(());
            }
            for family in &registry.families {
                println!("{}", family.bright_blue().bold());
                for tool in registry.family(family) {
                    let target = tool
                        .kind
                        .property()
                        .map(str::to_string)
                        .unwrap_or_else(|| match &tool.kind {
                            ToolKind::Script { action } => action.to_string(),
                            _ => String::new(),
                        });
                    println!(
                        "  {} {} [{} {}]",
                        tool.id.dimmed(),
                        tool.name.bright_white(),
                        tool.kind.type_name().cyan(),
                        target
                    );
                }
            }
        }
        ToolsCommand::Add(args) => {
            let tool = args.into_descriptor()?;
            let name = tool.name.clone();
            let registry = session.add_tool(tool).await?;
            let id = registry
                .tools
                .last()
                .map(|tool| tool.id.clone())
                .unwrap_or_default();
            println!("{} added {} as {}", "✓".green(), name.bright_white(), id.cyan());
        }
    }

    Ok(())
}
