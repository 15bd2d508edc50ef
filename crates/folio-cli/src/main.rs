use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use folio_core::{
    parse_markdown_to_blocks, render_blocks_to_html, serialize_blocks_to_markdown, Block, Page,
};
use folio_store::PageStore;

#[derive(Parser)]
#[command(version, about = "Folio - block note tools", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a markdown file into block JSON
    Parse {
        /// Path to a markdown file
        file: PathBuf,
    },
    /// Serialize block JSON back into markdown
    Export {
        /// Path to a block JSON file
        file: PathBuf,
    },
    /// Render a markdown file as an HTML fragment
    Render {
        /// Path to a markdown file
        file: PathBuf,
    },
    /// Manage the local page store
    Pages {
        /// Store directory
        #[arg(long, default_value = "./pages")]
        store: PathBuf,

        #[command(subcommand)]
        command: PagesCommand,
    },
}

#[derive(Subcommand)]
enum PagesCommand {
    /// Create a page, optionally seeded from a markdown file
    Add {
        title: String,

        /// Markdown file to import as the page body
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List pages, most recently updated first
    List,
    /// Print a page's markdown
    Show { id: String },
    /// Delete a page
    Rm { id: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file } => {
            let markdown = fs::read_to_string(&file).into_diagnostic()?;
            let blocks = parse_markdown_to_blocks(&markdown)?;
            let json = serde_json::to_string_pretty(&blocks).into_diagnostic()?;
            println!("{json}");
        }
        Commands::Export { file } => {
            let json = fs::read_to_string(&file).into_diagnostic()?;
            let blocks: Vec<Block> = serde_json::from_str(&json).into_diagnostic()?;
            println!("{}", serialize_blocks_to_markdown(&blocks));
        }
        Commands::Render { file } => {
            let markdown = fs::read_to_string(&file).into_diagnostic()?;
            let blocks = parse_markdown_to_blocks(&markdown)?;
            print!("{}", render_blocks_to_html(&blocks));
        }
        Commands::Pages { store, command } => {
            let store = PageStore::open(store)?;
            run_pages(&store, command)?;
        }
    }

    Ok(())
}

fn run_pages(store: &PageStore, command: PagesCommand) -> Result<()> {
    match command {
        PagesCommand::Add { title, file } => {
            let mut page = Page::new(title);
            if let Some(file) = file {
                let markdown = fs::read_to_string(&file).into_diagnostic()?;
                // normalize through the block model so the stored snapshot
                // matches what the editor would settle
                let blocks = parse_markdown_to_blocks(&markdown)?;
                page.set_markdown(serialize_blocks_to_markdown(&blocks));
            }
            store.save_page(&page)?;
            println!("{}", page.id);
        }
        PagesCommand::List => {
            for page in store.list_pages()? {
                println!("{}\t{}\t{}", page.id, page.updated_at, page.title);
            }
        }
        PagesCommand::Show { id } => {
            let page = store
                .get_page(&id)?
                .ok_or_else(|| miette::miette!("page not found: {id}"))?;
            println!("{}", page.markdown);
        }
        PagesCommand::Rm { id } => {
            store.delete_page(&id)?;
        }
    }
    Ok(())
}
