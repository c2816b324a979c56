use super::{open_session, parse_value, PageArgs};
use crate::commands::inspect::print_outline;
use crate::config::Config;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use scene_editor::{NodeId, ToolOutcome};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Element id to select (e.g. node_2)
    #[arg(long)]
    pub node: String,

    /// Registry tool id
    #[arg(long)]
    pub tool: String,

    /// Tool value; JSON literals are accepted, anything else is text
    #[arg(long)]
    pub value: Option<String>,

    /// Write the edited markup and style back to disk
    #[arg(long)]
    pub save: bool,
}

pub async fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd);

    session.initial_load(&args.page.paths()).await?;
    session.load_registry().await?;

    let node = NodeId::from(args.node.as_str());
    if !session.sandbox().contains(&node) {
        bail!("No element with id {}", node);
    }
    session.select(Some(node));

    let value = args
        .value
        .as_deref()
        .map(parse_value)
        .unwrap_or_default();

    match session.apply_tool_by_id(&args.tool, &value)? {
        Some(ToolOutcome::Style(change)) => println!(
            "{} {}: {} on {}",
            "✓".green(),
            change.property.bright_white(),
            change.value.cyan(),
            change.selected_id
        ),
        Some(ToolOutcome::Structure(change)) => {
            let detail = change
                .created_id
                .map(|id| format!("created {}", id))
                .or_else(|| change.removed_id.map(|id| format!("removed {}", id)))
                .unwrap_or_default();
            println!("{} {} {}", "✓".green(), change.action.to_string().bright_white(), detail);
        }
        None => println!("{} nothing changed", "⚠️".yellow()),
    }

    if let Some(outline) = session.outline() {
        print_outline(&outline, 1);
    }

    if args.save {
        session.save().await?;
        println!("{} saved {}", "✓".green(), args.page.html.bright_white());
    }

    Ok(())
}
