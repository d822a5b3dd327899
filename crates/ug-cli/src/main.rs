//! URL Group CLI
//!
//! CLI tool for validating rule lists and checking URLs against them.

mod rules;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use ug_core::redirect::ProcessRedirect;
use ug_core::set_redirect_addr;

use crate::rules::load_rule_list;

#[derive(Parser)]
#[command(name = "ug-cli")]
#[command(about = "URL group rule list tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which groups claim each URL and the resulting action
    Check {
        /// Rule list file
        #[arg(short, long)]
        rules: PathBuf,

        /// Redirect address, overriding the rule list's redirect_addr
        #[arg(long)]
        redirect_addr: Option<String>,

        /// Print one JSON object per URL
        #[arg(long)]
        json: bool,

        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Load a rule list and report rejected patterns
    Validate {
        /// Rule list file
        #[arg(short, long)]
        rules: PathBuf,
    },

    /// Dump the groups of a rule list
    Info {
        /// Rule list file
        #[arg(short, long)]
        rules: PathBuf,
    },
}

#[derive(Serialize)]
struct UrlReport<'a> {
    url: &'a str,
    matches: Vec<GroupMatch>,
}

#[derive(Serialize)]
struct GroupMatch {
    group: i64,
    access: String,
    action: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            rules,
            redirect_addr,
            json,
            urls,
        } => cmd_check(&rules, redirect_addr, json, &urls),
        Commands::Validate { rules } => cmd_validate(&rules),
        Commands::Info { rules } => cmd_info(&rules),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_check(path: &Path, redirect_addr: Option<String>, json: bool, urls: &[String]) -> Result<(), String> {
    let (list, _) = load_rule_list(path)?;

    list.apply_redirect();
    if let Some(addr) = redirect_addr {
        set_redirect_addr(addr);
    }

    for url in urls {
        let matches: Vec<GroupMatch> = list
            .groups
            .iter()
            .filter_map(|group| {
                let action = group.resolve_with(url, &ProcessRedirect)?;
                Some(GroupMatch {
                    group: group.id(),
                    access: group.access_type().to_string(),
                    action,
                })
            })
            .collect();

        if json {
            let report = UrlReport {
                url: url.as_str(),
                matches,
            };
            let line = serde_json::to_string(&report)
                .map_err(|e| format!("Failed to encode report: {}", e))?;
            println!("{}", line);
            continue;
        }

        if matches.is_empty() {
            println!("{url}: no group");
            continue;
        }

        println!("{url}:");
        for m in &matches {
            if m.action.is_empty() {
                println!("  group {:<6} {:<8}", m.group, m.access);
            } else {
                println!("  group {:<6} {:<8} -> {}", m.group, m.access, m.action);
            }
        }
    }

    Ok(())
}

fn cmd_validate(path: &Path) -> Result<(), String> {
    let (list, load_ms) = load_rule_list(path)?;
    let stats = &list.stats;

    println!("Rule list '{}'", path.display());
    println!("  Lines:       {}", stats.lines);
    println!("  Groups:      {}", stats.groups);
    println!("  Patterns:    {}", stats.patterns);
    println!("  Rejected:    {}", stats.rejected.len());
    println!("  Time:        {:.1}ms", load_ms);

    for rejected in &stats.rejected {
        println!(
            "  line {} (group {}): {}",
            rejected.line, rejected.group_id, rejected.reason
        );
    }

    if !stats.rejected.is_empty() {
        return Err(format!("{} pattern(s) rejected", stats.rejected.len()));
    }

    Ok(())
}

fn cmd_info(path: &Path) -> Result<(), String> {
    let (list, _) = load_rule_list(path)?;

    println!("Rule list: {}", path.display());
    match &list.redirect_addr {
        Some(addr) => println!("  Redirect:    {}", addr),
        None => println!("  Redirect:    (none)"),
    }
    println!();

    for group in &list.groups {
        print!("[{} {}", group.id(), group.access_type());
        if let Some(dest) = group.destination() {
            print!(" {}", dest);
        }
        let strategy = if group.access_type().is_regex() { "regex" } else { "suffix" };
        println!("] {} {} pattern(s)", group.len(), strategy);
        if !group.is_empty() {
            println!("  {}", group);
        }
    }

    Ok(())
}
