//! Direct message handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Message, MessageId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/messages`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    pub recipient_id: i64,
    pub text: String,
}

/// Send a message to another user.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageBody,
    responses(
        (status = 201, description = "Message sent", body = MessageSchema),
        (status = 400, description = "Empty text or self-addressed", body = ErrorSchema),
        (status = 404, description = "Recipient not found", body = ErrorSchema)
    ),
    tags = ["messaging"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SendMessageBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let message = state
        .messaging
        .send_message(&actor, UserId::new(body.recipient_id), body.text)
        .await?;
    Ok(HttpResponse::Created().json(message))
}

/// Messages addressed to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses(
        (status = 200, description = "Inbox", body = [MessageSchema]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["messaging"],
    operation_id = "inbox"
)]
#[get("/messages")]
pub async fn inbox(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Message>>> {
    let actor = session.require_actor()?;
    Ok(web::Json(state.messaging.inbox(&actor).await?))
}

/// Mark a received message read. Repeating the call keeps the first read
/// time.
#[utoipa::path(
    post,
    path = "/api/v1/messages/{id}/read",
    params(("id" = i64, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message with read time", body = MessageSchema),
        (status = 403, description = "Not the recipient", body = ErrorSchema),
        (status = 404, description = "Message not found", body = ErrorSchema)
    ),
    tags = ["messaging"],
    operation_id = "markRead"
)]
#[post("/messages/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Message>> {
    let actor = session.require_actor()?;
    let message = state
        .messaging
        .mark_read(&actor, MessageId::new(path.into_inner()))
        .await?;
    Ok(web::Json(message))
}
