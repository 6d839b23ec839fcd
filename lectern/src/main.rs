use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

use lectern::api::{HttpBackend, NotebookBackend};
use lectern::config::Config;
use lectern::models::{ChatRole, CreateNotebookRequest, ProcessingStatus};
use lectern::workspace::{NotebookState, SendOutcome, WorkspaceSession};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Terminal client for notebook workspaces with AI chat and knowledge graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all notebooks
    List,
    /// Create a new notebook
    Create {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a notebook and all of its documents
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Open an interactive workspace for a notebook
    Open { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let backend: Arc<dyn NotebookBackend> = Arc::new(HttpBackend::new(&config.api)?);

    match cli.command {
        Command::List => list_notebooks(backend.as_ref()).await,
        Command::Create { title, description } => {
            create_notebook(backend.as_ref(), title, description).await
        }
        Command::Delete { id, yes } => delete_notebook(backend.as_ref(), id, yes).await,
        Command::Open { id } => run_workspace(backend, id, &config).await,
    }
}

async fn list_notebooks(backend: &dyn NotebookBackend) -> anyhow::Result<()> {
    let notebooks = backend
        .list_notebooks()
        .await
        .context("Failed to load notebooks. Please check if the backend server is running")?;

    if notebooks.is_empty() {
        println!("No notebooks found. Create one with `lectern create <title>`.");
        return Ok(());
    }

    for nb in notebooks {
        println!(
            "{:>4}  {}  (created {})",
            nb.id,
            nb.title,
            nb.created_at.format("%Y-%m-%d")
        );
        if !nb.description.is_empty() {
            println!("      {}", nb.description);
        }
    }
    Ok(())
}

async fn create_notebook(
    backend: &dyn NotebookBackend,
    title: String,
    description: String,
) -> anyhow::Result<()> {
    let request = CreateNotebookRequest::new(title, description);
    request.validate()?;

    let notebook = backend
        .create_notebook(&request)
        .await
        .context("Failed to create notebook")?;
    println!("Created notebook {} ({})", notebook.id, notebook.title);
    Ok(())
}

async fn delete_notebook(backend: &dyn NotebookBackend, id: i64, yes: bool) -> anyhow::Result<()> {
    if !yes {
        print!("Delete notebook {id} and all of its documents? [y/N] ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        if !matches!(line.trim(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    backend
        .delete_notebook(id)
        .await
        .context("Failed to delete notebook")?;
    println!("Deleted notebook {id}.");
    Ok(())
}

async fn run_workspace(
    backend: Arc<dyn NotebookBackend>,
    id: i64,
    config: &Config,
) -> anyhow::Result<()> {
    let session = WorkspaceSession::open(backend, id, &config.workspace).await;

    match session.notebook_state().await {
        NotebookState::Loaded(notebook) => {
            println!("Notebook: {}", notebook.title);
            if !notebook.description.is_empty() {
                println!("{}", notebook.description);
            }
        }
        NotebookState::Failed(message) => {
            eprintln!("{message}");
            return Ok(());
        }
        NotebookState::Loading => {}
    }

    if let Some(greeting) = session.transcript().await.first() {
        println!("\nassistant: {}", greeting.content);
    }
    println!("Type a question to chat, or /docs, /graph, /upload <file>, /refresh, /quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/docs" => print_documents(&session).await,
            "/graph" => print_graph(&session).await,
            "/refresh" => {
                session.refresh_documents().await;
                print_documents(&session).await;
            }
            _ if input.starts_with("/upload") => {
                let path = input.trim_start_matches("/upload").trim();
                if path.is_empty() {
                    println!("Usage: /upload <file>");
                    continue;
                }
                upload_file(&session, Path::new(path)).await;
            }
            _ if input.starts_with('/') => {
                println!("Unknown command. Try /docs, /graph, /upload <file>, /refresh, /quit.");
            }
            query => {
                match session.send_chat(query).await {
                    SendOutcome::Sent => {
                        let transcript = session.transcript().await;
                        if let Some(reply) = transcript
                            .iter()
                            .rev()
                            .find(|m| m.role == ChatRole::Assistant)
                        {
                            println!("assistant: {}", reply.content);
                        }
                    }
                    SendOutcome::Busy => {
                        println!("Still answering the previous question.");
                    }
                    SendOutcome::Empty => {}
                }
            }
        }
    }

    session.close();
    Ok(())
}

async fn upload_file(session: &WorkspaceSession, path: &Path) {
    match session.upload_file(path).await {
        Ok(document) => {
            println!("Uploaded {} (document {})", document.filename, document.id);
        }
        Err(e) => {
            eprintln!("Failed to upload document: {e}");
        }
    }
}

async fn print_documents(session: &WorkspaceSession) {
    let state = session.document_state().await;
    if let Some(error) = &state.error {
        println!("{error}");
        return;
    }
    if state.documents.is_empty() {
        println!("No documents yet. Use /upload <file> to add one.");
        return;
    }
    for doc in &state.documents {
        println!("{:>4}  {}  [{}]", doc.id, doc.filename, doc.status);
        if let Some(error) = &doc.error_message {
            println!("      error: {error}");
        }
        if let Some(summary) = &doc.summary {
            println!("      {summary}");
        }
    }
}

async fn print_graph(session: &WorkspaceSession) {
    match session.graph().await {
        Some(graph) => {
            println!("{} nodes, {} links", graph.nodes.len(), graph.links.len());
            for node in &graph.nodes {
                println!("  [{}] {}", node.label, node.name);
            }
            for link in &graph.links {
                println!("  {} -> {}", link.source, link.target);
            }
        }
        None => {
            let documents = session.documents().await;
            match documents.first().map(|d| d.status) {
                Some(ProcessingStatus::Processing) | Some(ProcessingStatus::Pending) => {
                    println!("Processing document... extracting entities and relations.");
                }
                Some(ProcessingStatus::Completed) => {
                    println!("Graph not loaded yet. Try /refresh.");
                }
                Some(ProcessingStatus::Failed) => {
                    println!("Document processing failed; no graph available.");
                }
                None => println!("Upload a document to generate a knowledge graph."),
            }
        }
    }
}
