//! # Workflow Steps
//!
//! Each step reads what it needs from local state, makes exactly one call,
//! and either persists new state or fails. Steps are launched as separate
//! processes in [`StepKind::ALL`] order; the files named in
//! [`FlowConfig`] are their only shared channel.

pub mod authorize_user;
pub mod create_user;
pub mod fetch_books;
pub mod generate_token;
pub mod get_user;
pub mod rent_books;

use std::fmt::{self, Display};

use crate::environment::FlowConfig;
use crate::error::FlowError;
use crate::http::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    CreateUser,
    GenerateToken,
    AuthorizeUser,
    FetchBooks,
    RentBooks,
    GetUser,
}

impl StepKind {
    /// Dependency order: every step only reads keys written by those before it.
    pub const ALL: [StepKind; 6] = [
        StepKind::CreateUser,
        StepKind::GenerateToken,
        StepKind::AuthorizeUser,
        StepKind::FetchBooks,
        StepKind::RentBooks,
        StepKind::GetUser,
    ];

    /// Executable name of the step, without platform suffix.
    pub fn binary_name(self) -> &'static str {
        match self {
            StepKind::CreateUser => "bookstore-create-user",
            StepKind::GenerateToken => "bookstore-generate-token",
            StepKind::AuthorizeUser => "bookstore-authorize-user",
            StepKind::FetchBooks => "bookstore-fetch-books",
            StepKind::RentBooks => "bookstore-rent-books",
            StepKind::GetUser => "bookstore-get-user",
        }
    }

    pub async fn execute<T: Transport>(
        self,
        config: &FlowConfig,
        transport: &T,
    ) -> Result<(), FlowError> {
        match self {
            StepKind::CreateUser => create_user::run(config, transport).await,
            StepKind::GenerateToken => generate_token::run(config, transport).await,
            StepKind::AuthorizeUser => authorize_user::run(config, transport).await,
            StepKind::FetchBooks => fetch_books::run(config, transport).await,
            StepKind::RentBooks => rent_books::run(config, transport).await,
            StepKind::GetUser => get_user::run(config, transport).await,
        }
    }
}

impl Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepKind::CreateUser => "User Creation",
            StepKind::GenerateToken => "Token Generation",
            StepKind::AuthorizeUser => "Authorization Check",
            StepKind::FetchBooks => "Catalog Fetch",
            StepKind::RentBooks => "Book Rental",
            StepKind::GetUser => "User Retrieval",
        };
        write!(f, "{label}")
    }
}
