use super::{open_session, PageArgs};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use scene_editor::LiveNode;

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub page: PageArgs,
}

pub async fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd);

    let stamped = session.initial_load(&args.page.paths()).await?;
    let state = session.state();

    println!("{} {}", "Page".bright_blue().bold(), args.page.html.bright_white());
    println!(
        "  {} elements stamped, {} style rules, {} listeners",
        stamped.to_string().cyan(),
        state.css_rules.len().to_string().cyan(),
        state.js_analysis.len().to_string().cyan()
    );

    if !state.js_analysis.is_empty() {
        println!();
        println!("{}", "Listeners".bright_blue().bold());
        for listener in &state.js_analysis {
            println!(
                "  {} {} ({:?})",
                listener.target.bright_white(),
                listener.event.yellow(),
                listener.kind
            );
        }
    }

    if let Some(outline) = session.outline() {
        println!();
        println!("{}", "Live tree".bright_blue().bold());
        print_outline(&outline, 1);
    }

    Ok(())
}

pub fn print_outline(node: &LiveNode, depth: usize) {
    let id = node
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}{} {}",
        "  ".repeat(depth),
        format!("<{}>", node.tag).bright_white(),
        id.dimmed()
    );
    for child in &node.children {
        print_outline(child, depth + 1);
    }
}
