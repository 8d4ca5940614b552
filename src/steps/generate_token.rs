//! Exchange the stored credentials for a bearer token.

use crate::api::{self, LoginRequest, Reply, TokenReply};
use crate::environment::{FlowConfig, PASSWORD_KEY, Session, TOKEN_KEY, USERNAME_KEY};
use crate::error::FlowError;
use crate::http::{RequestInput, Transport};

pub async fn run<T: Transport>(config: &FlowConfig, transport: &T) -> Result<(), FlowError> {
    let store = config.env_store();
    let session = Session::open(&store)?;
    let username = session.require(USERNAME_KEY)?;
    let password = session.require(PASSWORD_KEY)?;

    let body = api::to_body(&LoginRequest {
        user_name: username,
        password,
    })?;
    let response = transport
        .send(RequestInput::post(config.endpoint(api::GENERATE_TOKEN_PATH), body))
        .await?;

    let token = match Reply::<TokenReply>::decode(&response, &[200])? {
        Reply::Ok(TokenReply { token: Some(token) }) if !token.is_empty() => token,
        Reply::Ok(_) => {
            return Err(FlowError::Validation(
                "Token not found in the response payload.".into(),
            ));
        }
        Reply::Unexpected { status, body } => {
            return Err(FlowError::UnexpectedStatus {
                context: "Failed to generate token".into(),
                status,
                body,
            });
        }
    };

    store.save([(TOKEN_KEY, token)])?;
    tracing::info!(path = %store.path().display(), "token persisted");
    println!("Successfully retrieved and saved token.");

    Ok(())
}
