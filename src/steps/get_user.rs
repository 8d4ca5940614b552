//! Fetch the account details, including the rented books.

use crate::api;
use crate::environment::{FlowConfig, Session, TOKEN_KEY, USER_ID_KEY};
use crate::error::FlowError;
use crate::http::{RequestInput, Transport};

pub async fn run<T: Transport>(config: &FlowConfig, transport: &T) -> Result<(), FlowError> {
    let session = Session::open(&config.env_store())?;
    let user_id = session.require(USER_ID_KEY)?;
    let token = session.require(TOKEN_KEY)?;

    let response = transport
        .send(RequestInput::get(config.endpoint(&api::user_path(user_id))).bearer(token))
        .await?;

    println!("Response status: {}", response.status);
    println!("Response body:");
    println!("{}", response.body);

    if response.status != 200 {
        return Err(FlowError::UnexpectedStatus {
            context: "Failed to retrieve user".into(),
            status: response.status,
            body: String::new(),
        });
    }

    Ok(())
}
