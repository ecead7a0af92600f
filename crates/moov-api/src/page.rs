use axum::response::Html;
use html_escape::encode_text as esc;

use crate::session::Identity;
use crate::views::View;

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

/// Wraps a view in the shared page shell.
pub fn render(identity: Option<&Identity>, view: &dyn View) -> Html<String> {
    let title = esc(view.title());
    let nav = nav(identity);
    let body = view.body();

    Html(fill(
        BASE_TEMPLATE,
        &[
            ("title", &*title),
            ("nav", nav.as_str()),
            ("content", body.as_str()),
        ],
    ))
}

fn nav(identity: Option<&Identity>) -> String {
    let mut links = String::from(
        "<a href=\"/\">Home</a><a href=\"/venues\">Venues</a><a href=\"/search\">Search</a>\
         <a href=\"/purchase\">Buy Tickets</a><a href=\"/host\">Host Event</a>\
         <a href=\"/messages\">Messages</a>",
    );
    match identity {
        Some(who) => {
            links.push_str("<a href=\"/profile\">Profile</a><a href=\"/logout\">Logout</a>");
            links.push_str(&format!("<span class=\"who\">Signed in as {}</span>", esc(&who.name)));
        }
        None => links.push_str("<a href=\"/login\">Login</a><a href=\"/signup\">Signup</a>"),
    }
    links
}

/// Substitutes `{key}` placeholders in one pass. Substituted text is never
/// rescanned, and braces that do not name a key are copied through.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = tail.find('}').and_then(|end| {
            let key = &tail[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end))
        });
        match hit {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
