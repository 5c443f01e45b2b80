use chrono::Local;
use clap::Subcommand;

use centavo_core::Category;
use centavo_store::{CategoryStore, RuleStore};

use crate::config::Config;

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List categories in stored (report) order.
    List,
    /// Show the category hierarchy.
    Tree,
    /// Create a user-defined category.
    Add {
        name: String,
        /// Existing category to group this one under (display only).
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a user-defined category with no rules referencing it.
    Delete { name: String },
}

pub fn run(config: &Config, command: CategoriesCommand) -> anyhow::Result<()> {
    let mut store = CategoryStore::load_or_seed(&config.categories_file)?;

    match command {
        CategoriesCommand::List => {
            let rules = RuleStore::open_or_seed(&config.rules_file)?;
            println!(
                "{:<32} {:<14} {:<7} {}",
                "Category", "Status", "Rules", "Parent"
            );
            for cat in store.categories() {
                let rule_count = rules.rules().iter().filter(|r| r.category == cat.name).count();
                println!(
                    "{:<32} {:<14} {:<7} {}",
                    cat.name,
                    if cat.is_user_defined { "User-defined" } else { "Built-in" },
                    rule_count,
                    cat.parent.as_deref().unwrap_or("(root)"),
                );
            }
            println!("\nTotal categories: {}", store.categories().len());
        }
        CategoriesCommand::Tree => {
            for root in store.roots() {
                println!("{}", root.name);
                print_children(&store, &root.name, 1);
            }
            let user_defined = store
                .categories()
                .iter()
                .filter(|c| c.is_user_defined)
                .count();
            println!("\nUser-defined: {user_defined}");
        }
        CategoriesCommand::Add {
            name,
            parent,
            description,
        } => {
            let category = Category::user_defined(
                name.trim(),
                parent.as_deref(),
                description.trim(),
                Local::now().date_naive(),
            );
            let name = category.name.clone();
            store.add_category(category)?;
            println!("Category '{name}' created");
        }
        CategoriesCommand::Delete { name } => {
            let rules = RuleStore::open_or_seed(&config.rules_file)?;
            let removed = store.delete_category(&name, rules.rules())?;
            println!("Category '{}' deleted", removed.name);
        }
    }
    Ok(())
}

fn print_children(store: &CategoryStore, parent: &str, depth: usize) {
    for child in store.children(parent) {
        let marker = if child.is_user_defined { "*" } else { "-" };
        println!("{}{} {}", "  ".repeat(depth), marker, child.name);
        print_children(store, &child.name, depth + 1);
    }
}
