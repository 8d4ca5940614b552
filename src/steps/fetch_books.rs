//! Download the catalog and replace the local ISBN-to-title file.

use serde_json::Value;

use crate::api::{self, BooksPage, Reply};
use crate::environment::FlowConfig;
use crate::error::FlowError;
use crate::http::{RequestInput, Transport};
use crate::storage;

const NO_AUTHOR: &str = "<no author provided>";

pub async fn run<T: Transport>(config: &FlowConfig, transport: &T) -> Result<(), FlowError> {
    let response = transport
        .send(RequestInput::get(config.endpoint(api::BOOKS_PATH)))
        .await?;

    let payload = match Reply::<Value>::decode(&response, &[200])? {
        Reply::Ok(payload) => payload,
        Reply::Unexpected { status, body } => {
            return Err(FlowError::UnexpectedStatus {
                context: "Failed to fetch books".into(),
                status,
                body,
            });
        }
    };

    let entries = BooksPage::try_from(payload)?.entries()?;
    if entries.is_empty() {
        return Err(FlowError::Validation(
            "No books with valid ISBN and title entries found.".into(),
        ));
    }

    println!("Fetched book details:");
    for entry in &entries {
        println!("ISBN: {}", entry.isbn);
        println!("Title: {}", entry.title);
        println!("Authors: {}", entry.author.as_deref().unwrap_or(NO_AUTHOR));
        println!();
    }

    let catalog = api::catalog_of(&entries);
    storage::save_books(&config.books_file, &catalog)?;
    tracing::info!(books = catalog.len(), path = %config.books_file.display(), "catalog persisted");
    println!(
        "Saved {} books to {}",
        catalog.len(),
        config.books_file.display()
    );

    Ok(())
}
