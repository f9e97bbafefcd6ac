use anyhow::{bail, Context};
use bookshelf_app::modules::books::{
    editor::{BookEditor, EditSubmit},
    forms::EditBookForm,
    models::Book,
    BOOKS,
};
use bookshelf_kernel::settings::Settings;
use bookshelf_resource::{fetch_entities, fetch_entity};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Bookshelf catalogue front end")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP front end
    Serve,
    /// Print every book as JSON
    List,
    /// Print one book with its press and location
    Show { id: i64 },
    /// Change selected fields of a book; omitted flags are left untouched
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        press_id: Option<i64>,
        #[arg(long)]
        address_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "bookshelf cli starting");

    match cli.command {
        Command::Serve => bookshelf_app::run(settings).await,
        Command::List => {
            let api = bookshelf_app::resource_client(&settings)?;
            let books = fetch_entities::<Book>(api.as_ref(), BOOKS).await;
            println!("{}", serde_json::to_string_pretty(&books.value)?);
            Ok(())
        }
        Command::Show { id } => {
            let api = bookshelf_app::resource_client(&settings)?;
            let book: Book = fetch_entity(api.as_ref(), BOOKS, id, &["Location", "Press"])
                .await
                .with_context(|| format!("book {id} could not be fetched"))?;
            println!("{}", serde_json::to_string_pretty(&book)?);
            Ok(())
        }
        Command::Edit {
            id,
            title,
            author,
            press_id,
            address_id,
        } => {
            let editor = BookEditor::new(bookshelf_app::resource_client(&settings)?);
            let form = EditBookForm {
                id: Some(id),
                title,
                author,
                press_id,
                address_id,
            };

            match editor.submit(id, form).await {
                EditSubmit::Updated => {
                    println!("book {id} updated");
                    Ok(())
                }
                EditSubmit::Invalid(view) => {
                    for error in &view.errors {
                        eprintln!(
                            "{}: {}",
                            error.field.as_deref().unwrap_or("book"),
                            error.message
                        );
                    }
                    bail!("book {id} was not updated")
                }
            }
        }
    }
}
