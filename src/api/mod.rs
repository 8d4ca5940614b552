//! Wire shapes of the Book Store / Account endpoints.
//!
//! Every reply is first sorted into [`Reply::Ok`] (expected status, body
//! decoded) or [`Reply::Unexpected`] (anything else, raw body kept), so the
//! steps match on a closed set of outcomes instead of probing JSON by hand.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FlowError;
use crate::http::HttpResponse;
use crate::storage::BookCatalog;

pub const CREATE_USER_PATH: &str = "/Account/v1/User";
pub const GENERATE_TOKEN_PATH: &str = "/Account/v1/GenerateToken";
pub const AUTHORIZED_PATH: &str = "/Account/v1/Authorized";
pub const BOOKS_PATH: &str = "/BookStore/v1/Books";

pub fn user_path(user_id: &str) -> String {
    format!("/Account/v1/User/{user_id}")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ok(T),
    Unexpected { status: u16, body: String },
}

impl<T: DeserializeOwned> Reply<T> {
    /// Decode `response` when its status is in `accepted`. A body that is not
    /// valid JSON under an accepted status is a protocol error.
    pub fn decode(response: &HttpResponse, accepted: &[u16]) -> Result<Self, FlowError> {
        if accepted.contains(&response.status) {
            Ok(Reply::Ok(response.json()?))
        } else {
            Ok(Reply::Unexpected {
                status: response.status,
                body: response.body.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "userName")]
    pub user_name: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub username: Option<String>,
}

/// Error envelope the API uses for rejected calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message: Option<String>,
}

/// Best human-readable explanation of a rejected call: the `message` field
/// when present, else the body itself, else a placeholder.
pub fn failure_message(body: &str) -> String {
    match serde_json::from_str::<ApiMessage>(body) {
        Ok(ApiMessage {
            message: Some(message),
        }) if !message.is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => "No response body returned".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenReply {
    pub token: Option<String>,
}

/// Body of the authorization check; only a bare JSON boolean is valid.
#[derive(Debug, Clone, PartialEq)]
pub enum Authorization {
    Authorized,
    NotAuthorized,
    Unexpected(Value),
}

impl From<Value> for Authorization {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(true) => Authorization::Authorized,
            Value::Bool(false) => Authorization::NotAuthorized,
            other => Authorization::Unexpected(other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BooksPage {
    pub books: Option<Value>,
}

impl TryFrom<Value> for BooksPage {
    type Error = FlowError;

    /// Only a JSON object carries the `books` field; any other shape fails.
    fn try_from(payload: Value) -> Result<Self, FlowError> {
        match payload {
            Value::Object(mut map) => Ok(BooksPage {
                books: map.remove("books"),
            }),
            _ => Err(FlowError::Validation(
                "Unexpected response format: 'books' list missing.".into(),
            )),
        }
    }
}

/// A catalog entry that carried both a string ISBN and a string title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
}

impl BooksPage {
    /// Well-formed entries of the `books` list. Malformed entries are dropped;
    /// a missing or non-list `books` field is an error.
    pub fn entries(&self) -> Result<Vec<BookEntry>, FlowError> {
        let Some(Value::Array(books)) = &self.books else {
            return Err(FlowError::Validation(
                "Unexpected response format: 'books' list missing.".into(),
            ));
        };
        Ok(books.iter().filter_map(book_entry).collect())
    }
}

fn book_entry(book: &Value) -> Option<BookEntry> {
    let book = book.as_object()?;
    let isbn = book.get("isbn")?.as_str()?;
    let title = book.get("title")?.as_str()?;
    let author = book
        .get("author")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    Some(BookEntry {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author,
    })
}

pub fn catalog_of(entries: &[BookEntry]) -> BookCatalog {
    entries
        .iter()
        .map(|e| (e.isbn.clone(), e.title.clone()))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct IsbnRef<'a> {
    pub isbn: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddBooksRequest<'a> {
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    #[serde(rename = "collectionOfIsbns")]
    pub collection_of_isbns: Vec<IsbnRef<'a>>,
}

/// Serialize a request payload for [`crate::http::RequestInput`].
pub fn to_body<T: Serialize>(payload: &T) -> Result<Value, FlowError> {
    serde_json::to_value(payload)
        .map_err(|e| FlowError::Validation(format!("Failed to encode request body: {e}")))
}
