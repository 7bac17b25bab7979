use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// "0.1.0" for releases, "0.1.0@abc1234 2026-01-15" for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "recipebook", bin_name = "recipebook", version = get_version())]
#[command(about = "Keep your recipes in one place", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to recipebook.toml in the data directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List recipes
    #[command(alias = "ls")]
    List,

    /// Show a recipe in full
    #[command(alias = "v")]
    Show {
        /// List position (1, 2, ...) or recipe id
        recipe: String,
    },

    /// Add a recipe
    #[command(alias = "n")]
    Add {
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Ingredient, repeatable
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,

        /// Instruction step, repeatable
        #[arg(short = 's', long = "step")]
        steps: Vec<String>,

        /// Image file (png or jpeg)
        #[arg(short, long)]
        photo: Option<PathBuf>,
    },

    /// Edit a recipe. Given lists replace the existing ones.
    #[command(alias = "e")]
    Edit {
        /// List position (1, 2, ...) or recipe id
        recipe: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,

        #[arg(short = 's', long = "step")]
        steps: Vec<String>,

        #[arg(short, long, conflicts_with = "remove_photo")]
        photo: Option<PathBuf>,

        /// Drop the recipe's photo
        #[arg(long)]
        remove_photo: bool,
    },

    /// Delete a recipe
    #[command(alias = "rm")]
    Delete {
        /// List position (1, 2, ...) or recipe id
        recipe: String,
    },
}
