//! Add two randomly chosen catalog books to the user's collection.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::api::{self, AddBooksRequest, IsbnRef};
use crate::environment::{FlowConfig, Session, TOKEN_KEY, USER_ID_KEY};
use crate::error::FlowError;
use crate::http::{RequestInput, Transport};
use crate::storage;

const BOOKS_PER_RENTAL: usize = 2;

pub async fn run<T: Transport>(config: &FlowConfig, transport: &T) -> Result<(), FlowError> {
    let session = Session::open(&config.env_store())?;
    let user_id = session.require(USER_ID_KEY)?;
    let token = session.require(TOKEN_KEY)?;

    let catalog = storage::load_books(&config.books_file)?;
    let isbns: Vec<&str> = catalog.keys().map(String::as_str).collect();
    if isbns.len() < BOOKS_PER_RENTAL {
        return Err(FlowError::InsufficientBooks { found: isbns.len() });
    }

    let selected: Vec<&str> = isbns
        .choose_multiple(&mut OsRng, BOOKS_PER_RENTAL)
        .copied()
        .collect();
    tracing::debug!(?selected, "books selected for rental");

    let body = api::to_body(&AddBooksRequest {
        user_id,
        collection_of_isbns: selected.iter().map(|&isbn| IsbnRef { isbn }).collect(),
    })?;
    let response = transport
        .send(RequestInput::post(config.endpoint(api::BOOKS_PATH), body).bearer(token))
        .await?;

    println!("Response status: {}", response.status);
    println!("Response body:");
    println!("{}", response.body);

    if !matches!(response.status, 200 | 201) {
        return Err(FlowError::UnexpectedStatus {
            context: "Failed to rent books".into(),
            status: response.status,
            body: String::new(),
        });
    }

    Ok(())
}
