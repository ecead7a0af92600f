use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use moov_db::Database;
use moov_db::models::NewUser;
use moov_types::UserType;
use moov_types::forms::{LoginForm, SignupForm};

use crate::notice::{Notice, NoticeQuery};
use crate::session::{Identity, RequestContext, current_user, removal_cookie};
use crate::state::blocking;
use crate::views::{LoginFormView, ProfileView, SignupFormView};
use crate::{AppError, AppState, page};

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Creates an attendee account. Taken names or emails are reported as
/// duplicates and the existing account is left as it was.
pub fn register(db: &Database, form: &SignupForm) -> Result<i64, AppError> {
    let password_hash = hash_password(&form.password)?;
    let id = db.create_user(&NewUser {
        name: &form.username,
        email: &form.email,
        password_hash: &password_hash,
        user_type: UserType::Attendee,
        interests: "",
    })?;
    Ok(id)
}

/// Checks a name/password pair against the stored hash.
pub fn authenticate(db: &Database, name: &str, password: &str) -> Result<Identity, AppError> {
    let user = db
        .get_user_by_name(name)?
        .ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    Ok(Identity {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}

pub async fn signup_page(ctx: RequestContext) -> Html<String> {
    page::render(ctx.identity.as_ref(), &SignupFormView)
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, AppError> {
    let name = form.username.clone();
    let user_id = blocking(&state, move |db| register(db, &form)).await?;

    info!(user_id, name = %name, "User registered");
    Ok(Redirect::to(&Notice::SignedUp.on("/login")))
}

pub async fn login_page(ctx: RequestContext, Query(query): Query<NoticeQuery>) -> Html<String> {
    let notice = query.notice().map(Notice::text);
    page::render(ctx.identity.as_ref(), &LoginFormView { notice })
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let name = username.clone();
    let identity = blocking(&state, move |db| authenticate(db, &username, &password))
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::InvalidCredentials) {
                warn!(name = %name, "Login rejected");
            }
        })?;

    let cookie = state.session.issue(&identity)?;
    info!(user_id = identity.id, "Login successful");
    Ok((jar.add(cookie), Redirect::to(&Notice::LoggedIn.on("/"))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.remove(removal_cookie()),
        Redirect::to(&Notice::LoggedOut.on("/")),
    )
}

pub async fn profile(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Html<String>, AppError> {
    let identity = current_user(&state, &ctx).await?;
    Ok(page::render(
        Some(&identity),
        &ProfileView {
            identity: &identity,
        },
    ))
}
