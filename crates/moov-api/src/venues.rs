use axum::{Form, extract::State, response::Html};
use tracing::debug;

use moov_types::forms::SearchForm;

use crate::session::RequestContext;
use crate::state::blocking;
use crate::views::{SearchFormView, SearchResultsView, VenueListView};
use crate::{AppError, AppState, page};

pub async fn list_venues(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Html<String>, AppError> {
    let names = blocking(&state, |db| Ok(db.list_venue_names()?)).await?;
    Ok(page::render(
        ctx.identity.as_ref(),
        &VenueListView { names: &names },
    ))
}

pub async fn search_page(ctx: RequestContext) -> Html<String> {
    page::render(ctx.identity.as_ref(), &SearchFormView)
}

pub async fn search(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let outcome = state.venues.search(&form.query);
    debug!(query = %form.query, "Venue search");
    page::render(
        ctx.identity.as_ref(),
        &SearchResultsView { outcome: &outcome },
    )
}
