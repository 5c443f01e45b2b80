use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Subcommand};

use centavo_core::Rule;
use centavo_engine::{Categorizer, VendorNormalizer};
use centavo_store::{CategoryStore, RuleStore};

use crate::config::Config;

#[derive(Subcommand)]
pub enum RulesCommand {
    /// List rules by priority, highest first.
    List {
        /// Show only user-defined rules.
        #[arg(long)]
        custom: bool,
    },
    /// Add a categorization rule.
    Add(AddArgs),
    /// Copy an existing rule under a new id.
    Duplicate { source_id: String, new_id: String },
    /// Delete a rule.
    Delete { id: String },
    /// Set or clear a rule's advisory override link.
    Override {
        id: String,
        /// Rule id this rule is meant to supersede.
        #[arg(long, conflicts_with = "clear")]
        target: Option<String>,
        /// Remove the override link.
        #[arg(long)]
        clear: bool,
    },
    /// Export user-defined rules to a separate CSV file.
    Export {
        #[arg(default_value = "custom_rules.csv")]
        path: PathBuf,
    },
    /// Show how a description normalizes and which rules would match.
    Test { description: String },
}

#[derive(Args)]
pub struct AddArgs {
    /// Rule id, e.g. C001.
    #[arg(long)]
    id: String,
    /// Evaluation priority; higher wins (1-150).
    #[arg(long)]
    priority: u32,
    /// Vendor substring this rule matches, case-insensitive.
    #[arg(long)]
    pattern: String,
    /// Category the matched transactions resolve to.
    #[arg(long)]
    category: String,
    #[arg(long, default_value = "")]
    explanation: String,
    /// Rule id this rule is meant to supersede (advisory).
    #[arg(long)]
    overrides: Option<String>,
}

pub fn run(config: &Config, command: RulesCommand) -> anyhow::Result<()> {
    let mut store = RuleStore::open_or_seed(&config.rules_file)?;

    match command {
        RulesCommand::List { custom } => {
            let categories = CategoryStore::load_or_seed(&config.categories_file)?;
            let known: HashSet<&str> = categories
                .categories()
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            let mut rules: Vec<&Rule> = if custom {
                store.custom_rules()
            } else {
                store.rules().iter().collect()
            };
            rules.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));

            println!(
                "{:<10} {:<10} {:<28} {:<30} {:<7} {}",
                "Priority", "ID", "Pattern", "Category", "Custom", "Override"
            );
            for rule in &rules {
                let marker = if known.contains(rule.category.as_str()) {
                    ""
                } else {
                    " [not in category store]"
                };
                println!(
                    "{:<10} {:<10} {:<28} {:<30} {:<7} {}{}",
                    rule.priority,
                    rule.id,
                    rule.pattern,
                    rule.category,
                    if rule.is_custom { "Yes" } else { "No" },
                    rule.override_rule_id.as_deref().unwrap_or("-"),
                    marker,
                );
            }
            println!("\nTotal rules: {}", rules.len());
        }
        RulesCommand::Add(args) => {
            let rule = Rule {
                id: args.id.trim().to_uppercase(),
                priority: args.priority,
                pattern: args.pattern.trim().to_uppercase(),
                category: args.category.trim().to_string(),
                explanation: if args.explanation.is_empty() {
                    format!("{} transaction", args.pattern.trim().to_uppercase())
                } else {
                    args.explanation
                },
                override_rule_id: args.overrides.map(|o| o.trim().to_uppercase()),
                is_custom: true,
                created_date: Local::now().date_naive(),
            };
            let id = rule.id.clone();
            store.add_rule(rule)?;
            println!("Rule '{id}' added");
        }
        RulesCommand::Duplicate { source_id, new_id } => {
            let copy = store.duplicate_rule(
                &source_id.to_uppercase(),
                &new_id.trim().to_uppercase(),
                Local::now().date_naive(),
            )?;
            println!("Rule '{}' duplicated as '{}'", source_id, copy.id);
        }
        RulesCommand::Delete { id } => {
            let removed = store.delete_rule(&id.to_uppercase())?;
            println!("Rule '{}' deleted", removed.id);
        }
        RulesCommand::Override { id, target, clear } => {
            let id = id.to_uppercase();
            if clear {
                store.set_override(&id, None)?;
                println!("Override removed from '{id}'");
            } else {
                let target = target
                    .ok_or_else(|| anyhow::anyhow!("pass --target <RULE_ID> or --clear"))?
                    .to_uppercase();
                store.set_override(&id, Some(&target))?;
                println!("Rule '{id}' now overrides '{target}'");
            }
        }
        RulesCommand::Export { path } => {
            let count = store.export_custom(&path)?;
            println!("{count} custom rule(s) exported to {}", path.display());
        }
        RulesCommand::Test { description } => {
            let normalizer = VendorNormalizer::with_defaults()?;
            let categorizer = Categorizer::new(store.snapshot(), &config.default_category);
            let vendor = normalizer.normalize(&description);
            println!("Description: {description}");
            println!("Canonical vendor: {vendor}");
            println!("\nMatching rules (winner first):");
            for rule in categorizer.matching_rules(&vendor) {
                println!(
                    "  [{:>3}] {:<10} '{}' -> {}",
                    rule.priority, rule.id, rule.pattern, rule.category
                );
            }
            let winner = categorizer.categorize(&vendor);
            println!("\nResolved category: {}", winner.category);
        }
    }
    Ok(())
}
