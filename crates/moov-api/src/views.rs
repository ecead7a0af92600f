//! Typed view models. Each one renders its own HTML fragment; every value
//! that came from a user or the database is escaped on the way out.

use std::fmt::Write;

use html_escape::encode_text as esc;
use moov_db::models::{MessageRow, PurchaseReceipt};

use crate::catalog::SearchOutcome;
use crate::session::Identity;

pub trait View {
    fn title(&self) -> &str;
    fn body(&self) -> String;
}

fn notice_html(notice: Option<&str>) -> String {
    notice
        .map(|n| format!("<p class=\"notice\">{}</p>\n", esc(n)))
        .unwrap_or_default()
}

// -- Home --

pub struct WelcomeView<'a> {
    pub notice: Option<&'a str>,
}

impl View for WelcomeView<'_> {
    fn title(&self) -> &str {
        "Welcome"
    }

    fn body(&self) -> String {
        format!(
            "{}<h2>Welcome to MOOV!</h2>\n\
             <p>MOOV is your event management and ticketing platform.</p>",
            notice_html(self.notice)
        )
    }
}

pub struct HomeView<'a> {
    pub notice: Option<&'a str>,
    pub name: &'a str,
    pub inbox: &'a [MessageRow],
}

impl View for HomeView<'_> {
    fn title(&self) -> &str {
        "Home"
    }

    fn body(&self) -> String {
        let mut html = format!(
            "{}<h2>Welcome, {}!</h2>\n<h3>Your Messages</h3>\n",
            notice_html(self.notice),
            esc(self.name)
        );
        if self.inbox.is_empty() {
            html.push_str("<p>No messages yet.</p>");
            return html;
        }
        html.push_str("<ul>\n");
        for m in self.inbox {
            let _ = writeln!(
                html,
                "<li><strong>From {}:</strong> {}</li>",
                esc(&m.sender_name),
                esc(&m.content)
            );
        }
        html.push_str("</ul>");
        html
    }
}

// -- Venues --

pub struct VenueListView<'a> {
    pub names: &'a [String],
}

impl View for VenueListView<'_> {
    fn title(&self) -> &str {
        "Venues"
    }

    fn body(&self) -> String {
        if self.names.is_empty() {
            return "<h2>No venues available</h2>".to_string();
        }
        let mut html = String::from("<h2>All Venues</h2>\n<ul>\n");
        for name in self.names {
            let _ = writeln!(html, "<li>{}</li>", esc(name));
        }
        html.push_str("</ul>");
        html
    }
}

pub struct SearchFormView;

impl View for SearchFormView {
    fn title(&self) -> &str {
        "Search Venues"
    }

    fn body(&self) -> String {
        r#"<h2>Search Venues</h2>
<form method="POST" action="/search">
    <label for="query">Search Query:</label><br>
    <input type="text" id="query" name="query" required>
    <button type="submit">Search</button>
</form>"#
            .to_string()
    }
}

pub struct SearchResultsView<'a> {
    pub outcome: &'a SearchOutcome<'a>,
}

impl View for SearchResultsView<'_> {
    fn title(&self) -> &str {
        "Search Results"
    }

    fn body(&self) -> String {
        let found = match self.outcome {
            SearchOutcome::NoData => return "<h2>No venue data available</h2>".to_string(),
            SearchOutcome::Matches(found) if found.is_empty() => {
                return "<h2>No results found</h2>".to_string();
            }
            SearchOutcome::Matches(found) => found,
        };

        // Every row comes from the same file, so the first one carries the columns
        let extra: Vec<&str> = found[0].details.iter().map(|(k, _)| k.as_str()).collect();

        let mut html = String::from("<h2>Search Results</h2>\n<table class=\"venues\">\n<tr><th>Name</th><th>Type</th>");
        for header in &extra {
            let _ = write!(html, "<th>{}</th>", esc(header));
        }
        html.push_str("</tr>\n");

        for venue in found {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td>",
                esc(&venue.name),
                esc(&venue.kind)
            );
            for (_, value) in &venue.details {
                let _ = write!(html, "<td>{}</td>", esc(value));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>");
        html
    }
}

// -- Events --

pub struct PurchaseFormView;

impl View for PurchaseFormView {
    fn title(&self) -> &str {
        "Purchase Tickets"
    }

    fn body(&self) -> String {
        r#"<h2>Purchase Tickets</h2>
<form method="POST" action="/purchase">
    <label for="event_name">Event Name:</label>
    <input type="text" id="event_name" name="event_name" required>
    <label for="ticket_quantity">Ticket Quantity:</label>
    <input type="number" id="ticket_quantity" name="ticket_quantity" min="1" required>
    <button type="submit">Purchase</button>
</form>"#
            .to_string()
    }
}

pub struct PurchaseReceiptView<'a> {
    pub receipt: &'a PurchaseReceipt,
}

impl View for PurchaseReceiptView<'_> {
    fn title(&self) -> &str {
        "Purchase Successful"
    }

    fn body(&self) -> String {
        let r = self.receipt;
        format!(
            "<h2>Purchase Successful</h2>\n\
             <p>You have purchased {} ticket(s) for '{}' at {} each.</p>\n\
             <p>Total: {}</p>",
            r.quantity,
            esc(&r.event_name),
            r.unit_price,
            r.total_price
        )
    }
}

pub struct HostFormView;

impl View for HostFormView {
    fn title(&self) -> &str {
        "Host an Event"
    }

    fn body(&self) -> String {
        r#"<h2>Host an Event</h2>
<form method="POST" action="/host">
    <label for="event_name">Event Name:</label>
    <input type="text" id="event_name" name="event_name" required>
    <label for="venue">Venue:</label>
    <input type="text" id="venue" name="venue" required>
    <label for="date_time">Date and Time:</label>
    <input type="text" id="date_time" name="date_time" required>
    <label for="ticket_price">Ticket Price:</label>
    <input type="number" id="ticket_price" name="ticket_price" min="0" step="0.01" required>
    <button type="submit">Host Event</button>
</form>"#
            .to_string()
    }
}

pub struct EventHostedView<'a> {
    pub name: &'a str,
}

impl View for EventHostedView<'_> {
    fn title(&self) -> &str {
        "Event Hosted"
    }

    fn body(&self) -> String {
        format!(
            "<h2>Event Hosted</h2>\n<p>Your event '{}' has been successfully hosted!</p>",
            esc(self.name)
        )
    }
}

// -- Auth --

pub struct SignupFormView;

impl View for SignupFormView {
    fn title(&self) -> &str {
        "Signup"
    }

    fn body(&self) -> String {
        r#"<h2>Signup</h2>
<form method="POST" action="/signup">
    <label for="username">Username:</label><br>
    <input type="text" id="username" name="username" required><br>
    <label for="email">Email:</label><br>
    <input type="email" id="email" name="email" required><br>
    <label for="password">Password:</label><br>
    <input type="password" id="password" name="password" required><br>
    <button type="submit">Signup</button>
</form>"#
            .to_string()
    }
}

pub struct LoginFormView<'a> {
    pub notice: Option<&'a str>,
}

impl View for LoginFormView<'_> {
    fn title(&self) -> &str {
        "Login"
    }

    fn body(&self) -> String {
        let notice = notice_html(self.notice);
        format!(
            r#"{notice}<h2>Login</h2>
<form method="POST" action="/login">
    <label for="username">Username:</label><br>
    <input type="text" id="username" name="username" required><br>
    <label for="password">Password:</label><br>
    <input type="password" id="password" name="password" required><br>
    <button type="submit">Login</button>
</form>"#
        )
    }
}

pub struct ProfileView<'a> {
    pub identity: &'a Identity,
}

impl View for ProfileView<'_> {
    fn title(&self) -> &str {
        "Profile"
    }

    fn body(&self) -> String {
        format!(
            "<h2>Profile</h2>\n<p>Name: {}</p>\n<p>Email: {}</p>\n<p>User ID: {}</p>\n\
             <a href=\"/logout\"><button>Logout</button></a>",
            esc(&self.identity.name),
            esc(&self.identity.email),
            self.identity.id
        )
    }
}

// -- Messages --

pub struct MessagesView<'a> {
    pub messages: &'a [MessageRow],
}

impl View for MessagesView<'_> {
    fn title(&self) -> &str {
        "Messages"
    }

    fn body(&self) -> String {
        let mut html = String::from("<h2>Messages</h2>\n<ul>\n");
        for m in self.messages {
            let _ = writeln!(
                html,
                "<li><strong>{} &rarr; {}:</strong> {}</li>",
                esc(&m.sender_name),
                esc(&m.receiver_name),
                esc(&m.content)
            );
        }
        html.push_str(
            r#"</ul>
<h3>Send a Message</h3>
<form method="POST" action="/messages">
    <label for="receiver_id">Receiver ID:</label>
    <input type="text" id="receiver_id" name="receiver_id" required>
    <label for="content">Message:</label>
    <input type="text" id="content" name="content" required>
    <button type="submit">Send</button>
</form>"#,
        );
        html
    }
}

// -- Errors --

pub struct ErrorView {
    pub message: String,
}

impl View for ErrorView {
    fn title(&self) -> &str {
        "Error"
    }

    fn body(&self) -> String {
        format!("<h2>Error</h2>\n<p>{}</p>", esc(&self.message))
    }
}

#[cfg(test)]
mod tests {
    use moov_db::models::VenueRow;
    use moov_types::Price;

    use super::*;

    fn message(content: &str) -> MessageRow {
        MessageRow {
            id: 1,
            sender_id: 1,
            sender_name: "<b>angel</b>".into(),
            receiver_id: 2,
            receiver_name: "sarah".into(),
            content: content.into(),
        }
    }

    #[test]
    fn user_text_is_escaped() {
        let messages = [message("<script>alert(1)</script>")];
        let html = MessagesView {
            messages: &messages,
        }
        .body();

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;angel&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn no_data_and_no_match_render_differently() {
        let no_data = SearchResultsView {
            outcome: &SearchOutcome::NoData,
        }
        .body();
        let no_match = SearchResultsView {
            outcome: &SearchOutcome::Matches(vec![]),
        }
        .body();

        assert!(no_data.contains("No venue data available"));
        assert!(no_match.contains("No results found"));
        assert_ne!(no_data, no_match);
    }

    #[test]
    fn search_results_include_extra_columns() {
        let venue = VenueRow {
            name: "Fox Theatre".into(),
            kind: "Theater".into(),
            details: vec![("Address".into(), "660 Peachtree St NE".into())],
        };
        let outcome = SearchOutcome::Matches(vec![&venue]);
        let html = SearchResultsView { outcome: &outcome }.body();

        assert!(html.contains("<th>Address</th>"));
        assert!(html.contains("<td>660 Peachtree St NE</td>"));
    }

    #[test]
    fn receipt_shows_unit_and_total_price() {
        let receipt = PurchaseReceipt {
            event_id: 1,
            event_name: "Jazz Night".into(),
            quantity: 3,
            unit_price: Price::from_cents(1250),
            total_price: Price::from_cents(3750),
            remaining: 97,
        };
        let html = PurchaseReceiptView { receipt: &receipt }.body();

        assert!(html.contains("3 ticket(s) for 'Jazz Night' at $12.50 each"));
        assert!(html.contains("Total: $37.50"));
    }

    #[test]
    fn notice_is_shown_above_the_greeting() {
        let html = HomeView {
            notice: Some("Login successful!"),
            name: "angel",
            inbox: &[],
        }
        .body();

        assert!(html.starts_with("<p class=\"notice\">Login successful!</p>"));
        assert!(html.contains("No messages yet."));
        assert!(!WelcomeView { notice: None }.body().contains("notice"));
    }

    #[test]
    fn empty_venue_list_says_so() {
        assert!(VenueListView { names: &[] }.body().contains("No venues available"));
    }
}
