use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Redirect},
};
use tracing::debug;

use moov_types::forms::SendMessageForm;

use crate::notice::{Notice, NoticeQuery};
use crate::session::{RequestContext, current_user};
use crate::state::blocking;
use crate::views::{HomeView, MessagesView, WelcomeView};
use crate::{AppError, AppState, page};

/// Landing page: a welcome for visitors, the inbox for logged-in users.
pub async fn home(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let notice = query.notice().map(Notice::text);
    if ctx.identity.is_none() {
        return Ok(page::render(None, &WelcomeView { notice }));
    }

    let identity = current_user(&state, &ctx).await?;
    let user_id = identity.id;
    let inbox = blocking(&state, move |db| Ok(db.inbox(user_id)?)).await?;
    debug!(user_id, count = inbox.len(), "Inbox loaded");

    Ok(page::render(
        Some(&identity),
        &HomeView {
            notice,
            name: &identity.name,
            inbox: &inbox,
        },
    ))
}

pub async fn list_messages(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Html<String>, AppError> {
    let identity = current_user(&state, &ctx).await?;

    let user_id = identity.id;
    let messages = blocking(&state, move |db| Ok(db.messages_for_user(user_id)?)).await?;

    Ok(page::render(
        Some(&identity),
        &MessagesView {
            messages: &messages,
        },
    ))
}

pub async fn send_message(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<SendMessageForm>,
) -> Result<Redirect, AppError> {
    let sender_id = current_user(&state, &ctx).await?.id;
    let receiver_id: i64 = form
        .receiver_id
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput("Receiver ID must be a number.".into()))?;

    let content = form.content;
    let message_id = blocking(&state, move |db| {
        Ok(db.insert_message(sender_id, receiver_id, &content)?)
    })
    .await?;

    debug!(message_id, sender_id, receiver_id, "Message sent");
    Ok(Redirect::to("/messages"))
}
