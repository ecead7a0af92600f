use axum::{Form, extract::State, response::Html};
use tracing::info;

use moov_db::models::NewEvent;
use moov_types::Price;
use moov_types::forms::{HostEventForm, PurchaseForm};

use crate::session::{RequestContext, current_user};
use crate::state::blocking;
use crate::views::{EventHostedView, HostFormView, PurchaseFormView, PurchaseReceiptView};
use crate::{AppError, AppState, page};

pub async fn purchase_page(ctx: RequestContext) -> Html<String> {
    page::render(ctx.identity.as_ref(), &PurchaseFormView)
}

pub async fn purchase(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<PurchaseForm>,
) -> Result<Html<String>, AppError> {
    let quantity: i64 = form.ticket_quantity.trim().parse().map_err(|_| {
        AppError::InvalidInput("Ticket quantity must be a whole number.".into())
    })?;
    if quantity < 1 {
        return Err(AppError::InvalidInput(
            "Ticket quantity must be at least 1.".into(),
        ));
    }

    let event_name = form.event_name;
    let receipt = blocking(&state, move |db| {
        db.purchase_tickets(&event_name, quantity)
            .map_err(|e| match e {
                moov_db::Error::NotFound => {
                    AppError::NotFound(format!("Event '{event_name}' not found."))
                }
                moov_db::Error::InsufficientInventory { available, .. } => {
                    AppError::InsufficientInventory {
                        event: event_name.clone(),
                        available,
                    }
                }
                other => other.into(),
            })
    })
    .await?;

    info!(
        event_id = receipt.event_id,
        quantity = receipt.quantity,
        remaining = receipt.remaining,
        "Tickets purchased"
    );
    Ok(page::render(
        ctx.identity.as_ref(),
        &PurchaseReceiptView { receipt: &receipt },
    ))
}

pub async fn host_page(ctx: RequestContext) -> Result<Html<String>, AppError> {
    let identity = ctx.require_identity()?;
    Ok(page::render(Some(identity), &HostFormView))
}

pub async fn host(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<HostEventForm>,
) -> Result<Html<String>, AppError> {
    let identity = current_user(&state, &ctx).await?;
    let ticket_price: Price = form
        .ticket_price
        .parse()
        .map_err(|e| AppError::InvalidInput(format!("Invalid ticket price: {e}.")))?;

    let HostEventForm {
        event_name,
        venue,
        date_time,
        ..
    } = form;
    let name = event_name.clone();
    let event_id = blocking(&state, move |db| {
        Ok(db.create_event(&NewEvent {
            name: &event_name,
            venue: &venue,
            date_time: &date_time,
            ticket_price,
        })?)
    })
    .await?;

    info!(event_id, host = identity.id, "Event hosted");
    Ok(page::render(Some(&identity), &EventHostedView { name: &name }))
}
