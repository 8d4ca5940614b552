//! Ask the API whether the stored credentials are authorized.

use serde_json::Value;

use crate::api::{self, Authorization, LoginRequest, Reply};
use crate::environment::{FlowConfig, PASSWORD_KEY, Session, USERNAME_KEY};
use crate::error::FlowError;
use crate::http::{RequestInput, Transport};

pub async fn run<T: Transport>(config: &FlowConfig, transport: &T) -> Result<(), FlowError> {
    let session = Session::open(&config.env_store())?;
    let username = session.require(USERNAME_KEY)?;
    let password = session.require(PASSWORD_KEY)?;

    let body = api::to_body(&LoginRequest {
        user_name: username,
        password,
    })?;
    let response = transport
        .send(RequestInput::post(config.endpoint(api::AUTHORIZED_PATH), body))
        .await?;

    match Reply::<Value>::decode(&response, &[200])? {
        Reply::Ok(value) => match Authorization::from(value) {
            Authorization::Authorized => println!("User is authorized."),
            Authorization::NotAuthorized => println!("User is NOT authorized."),
            Authorization::Unexpected(other) => {
                return Err(FlowError::Validation(format!(
                    "Unexpected response format: {other}"
                )));
            }
        },
        Reply::Unexpected { status, body } => {
            return Err(FlowError::UnexpectedStatus {
                context: "Failed to verify authorization".into(),
                status,
                body,
            });
        }
    }

    Ok(())
}
