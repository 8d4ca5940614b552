//! Register a freshly generated account and persist its credentials.

use crate::api::{self, CreatedUser, LoginRequest, Reply};
use crate::auth::Credentials;
use crate::environment::{FlowConfig, PASSWORD_KEY, USER_ID_KEY, USERNAME_KEY};
use crate::error::FlowError;
use crate::http::{RequestInput, Transport};

pub async fn run<T: Transport>(config: &FlowConfig, transport: &T) -> Result<(), FlowError> {
    let credentials = Credentials::generate()?;
    println!("Generated username: {}", credentials.username);
    println!("Generated password: {}", credentials.password);

    register(config, transport, &credentials).await
}

pub(crate) async fn register<T: Transport>(
    config: &FlowConfig,
    transport: &T,
    credentials: &Credentials,
) -> Result<(), FlowError> {
    let body = api::to_body(&LoginRequest {
        user_name: &credentials.username,
        password: &credentials.password,
    })?;
    let response = transport
        .send(RequestInput::post(config.endpoint(api::CREATE_USER_PATH), body))
        .await?;

    let created = match Reply::<CreatedUser>::decode(&response, &[201])? {
        Reply::Ok(created) => created,
        Reply::Unexpected { status, body } => {
            return Err(FlowError::UnexpectedStatus {
                context: "Failed to create user".into(),
                status,
                body: api::failure_message(&body),
            });
        }
    };

    let user_id = created
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| FlowError::Validation("userID not found in the response payload.".into()))?;
    let username = created
        .username
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| credentials.username.clone());

    println!("Successfully created user!");
    println!("userID: {user_id}");
    println!("username: {username}");

    let store = config.env_store();
    store.save([
        (USERNAME_KEY, username),
        (PASSWORD_KEY, credentials.password.clone()),
        (USER_ID_KEY, user_id),
    ])?;
    tracing::info!(path = %store.path().display(), "credentials persisted");
    println!("Saved credentials to {}", store.path().display());

    Ok(())
}
