use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use docvault_core::{
    BodyStatus, CoreConfig, Database, DocumentId, DocumentService, SqliteDocumentStore,
};
use docvault_files::{hash_reader, FilesService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docvault")]
#[command(about = "DocVault document store CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all documents
    List,
    /// Show one document's metadata
    Show {
        /// Document id
        id: i64,
        /// Also print the file content
        #[arg(long)]
        body: bool,
    },
    /// Upload a file (new document or next version of an existing one)
    Upload {
        /// File to upload
        file: PathBuf,
        /// Store under this name instead of the file's own name
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a document record
    Delete {
        /// Document id
        id: i64,
    },
    /// Print the content hash of a file without touching the store
    Hash {
        /// File to hash
        file: PathBuf,
    },
}

fn document_service(cfg: &CoreConfig) -> anyhow::Result<DocumentService> {
    let db = Database::open(cfg.database_path())?;
    let files = FilesService::new(cfg.storage_root())?;
    Ok(DocumentService::new(
        cfg,
        Arc::new(SqliteDocumentStore::new(db)),
        files,
    ))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docvault=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => {
            let service = document_service(&CoreConfig::from_env()?)?;
            match service.list() {
                Ok(documents) if documents.is_empty() => println!("No documents found."),
                Ok(documents) => {
                    for doc in documents {
                        println!(
                            "ID: {}, Title: {}, Version: {}, Hash: {}, Updated: {}",
                            doc.id, doc.title, doc.version, doc.hash, doc.updated_at
                        );
                    }
                }
                Err(e) => eprintln!("Error listing documents: {}", e),
            }
        }
        Some(Commands::Show { id, body }) => {
            let service = document_service(&CoreConfig::from_env()?)?;
            match service.get(DocumentId::new(id)) {
                Ok(retrieved) => {
                    let doc = &retrieved.document;
                    println!("ID:      {}", doc.id);
                    println!("Title:   {}", doc.title);
                    println!("Path:    {}", doc.path);
                    println!("Version: {}", doc.version);
                    println!("Author:  {}", doc.author);
                    println!("Hash:    {}", doc.hash);
                    println!("Created: {}", doc.created_at);
                    println!("Updated: {}", doc.updated_at);
                    match &retrieved.body {
                        BodyStatus::Loaded(bytes) if body => {
                            println!();
                            println!("{}", String::from_utf8_lossy(bytes));
                        }
                        BodyStatus::Loaded(bytes) => println!("Size:    {} bytes", bytes.len()),
                        BodyStatus::Missing(reason) => {
                            eprintln!("Warning: file unavailable: {}", reason)
                        }
                    }
                }
                Err(e) => eprintln!("Error reading document {}: {}", id, e),
            }
        }
        Some(Commands::Upload { file, name }) => {
            let service = document_service(&CoreConfig::from_env()?)?;
            let name = name.unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let reader = BufReader::new(File::open(&file)?);
            match service.upload(&name, reader) {
                Ok(uploaded) => println!(
                    "{}: ID {} \"{}\" version {}",
                    uploaded.action,
                    uploaded.document.id,
                    uploaded.document.title,
                    uploaded.document.version
                ),
                Err(e) => eprintln!("Error uploading {}: {}", file.display(), e),
            }
        }
        Some(Commands::Delete { id }) => {
            let service = document_service(&CoreConfig::from_env()?)?;
            match service.delete(DocumentId::new(id)) {
                Ok(doc) => println!("Deleted document {} ({})", doc.id, doc.title),
                Err(e) => eprintln!("Error deleting document {}: {}", id, e),
            }
        }
        Some(Commands::Hash { file }) => {
            let hash = hash_reader(BufReader::new(File::open(&file)?))?;
            println!("{}  {}", hash, file.display());
        }
        None => {
            println!("Use 'docvault --help' for commands");
        }
    }

    Ok(())
}
