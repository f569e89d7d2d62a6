use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::modules::books::controller::{BookListController, Submitted};
use shelf_app::modules::books::models::{BookId, BookRecord, BookStatus};
use shelf_kernel::settings::Settings;

/// Manage the book inventory from the command line
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve,
    /// Print books, optionally filtered by title or author
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, default_value_t = BookStatus::Available)]
        status: BookStatus,
    },
    /// Change fields of an existing book
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        status: Option<BookStatus>,
    },
    /// Delete a book
    Delete { id: String },
}

fn print_book(book: &BookRecord) {
    println!("{}\t{}\t{}\t{}", book.id, book.title, book.author, book.status);
}

async fn controller(settings: &Settings) -> anyhow::Result<BookListController> {
    let store = shelf_db::connect(&settings.store).context("failed to connect book store")?;
    let mut controller =
        BookListController::new(store, Duration::from_millis(settings.store.timeout_ms));
    controller.load().await?;
    Ok(controller)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry);

    match cli.command {
        Command::Serve => shelf_app::run(settings).await?,
        Command::List { search } => {
            let mut controller = controller(&settings).await?;
            if let Some(query) = search {
                controller.search(query);
            }
            for book in controller.visible() {
                print_book(book);
            }
        }
        Command::Add {
            title,
            author,
            status,
        } => {
            let mut controller = controller(&settings).await?;
            controller.set_title(title);
            controller.set_author(author);
            controller.set_status(status);
            if let Submitted::Created(book) = controller.submit().await? {
                print_book(&book);
            }
        }
        Command::Edit {
            id,
            title,
            author,
            status,
        } => {
            let id = BookId::from(id);
            let mut controller = controller(&settings).await?;
            controller.begin_edit_by_id(&id)?;
            if let Some(title) = title {
                controller.set_title(title);
            }
            if let Some(author) = author {
                controller.set_author(author);
            }
            if let Some(status) = status {
                controller.set_status(status);
            }
            controller.submit().await?;
            if let Some(book) = controller.state().books.iter().find(|b| b.id == id) {
                print_book(book);
            }
        }
        Command::Delete { id } => {
            let mut controller = controller(&settings).await?;
            controller.delete(&BookId::from(id)).await?;
        }
    }

    Ok(())
}
