//! Server-rendered guest form and admin dashboard

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use rsvp_common::{Answer, Classification, FormAction, FormStep, RsvpRecord, RsvpSubmission, Tally};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::warn;

use crate::config::EventDetails;
use crate::handlers::AppState;

const SUBMIT_FAILED: &str = "Er ging iets mis. Probeer het opnieuw.";

/// Fields posted by every step of the guest form
#[derive(Debug, Default, Deserialize)]
pub struct FormFields {
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub response: String,
}

impl FormFields {
    /// Rebuild the step the form was rendered from
    fn restore_step(&self) -> FormStep {
        match self.step.as_str() {
            "question" if !self.name.trim().is_empty() => {
                let step = FormStep::Question {
                    name: self.name.trim().to_string(),
                    answer: None,
                };
                match Answer::parse(&self.response) {
                    Some(answer) => step.apply(FormAction::Choose(answer)),
                    None => step,
                }
            }
            _ => FormStep::Welcome {
                name: self.name.clone(),
            },
        }
    }

    fn action(&self) -> Option<FormAction> {
        match self.action.as_str() {
            "continue" => Some(FormAction::Continue {
                name: self.name.clone(),
            }),
            "back" => Some(FormAction::Back),
            "submit" => Some(FormAction::Submit),
            _ => None,
        }
    }
}

/// GET /
pub async fn form_page_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_step(&FormStep::default(), None, &state.event))
}

/// POST /
pub async fn form_submit_handler(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<FormFields>,
) -> Html<String> {
    let current = fields.restore_step();
    let next = match fields.action() {
        Some(action) => current.clone().apply(action),
        None => current.clone(),
    };

    if let FormStep::Thanks { name, answer } = &next {
        let submission = RsvpSubmission::new(name.clone(), answer.as_str());
        if let Err(e) = state.service.submit(submission).await {
            warn!("Guest form submission failed: {}", e);
            return Html(render_step(&current, Some(SUBMIT_FAILED), &state.event));
        }
    }

    Html(render_step(&next, None, &state.event))
}

/// GET /admin
pub async fn admin_page_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.service.collect().await {
        Ok(records) => Html(render_dashboard(&records)).into_response(),
        Err(e) => {
            let error = if state.expose_error_details {
                e.to_string()
            } else {
                "Failed to fetch RSVPs".to_string()
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_dashboard_error(&error)),
            )
                .into_response()
        }
    }
}

/// Render one step of the guest form
pub fn render_step(step: &FormStep, error: Option<&str>, event: &EventDetails) -> String {
    let mut body = format!(
        r#"<div class="step-indicator">{} → {}</div>"#,
        step.number(),
        FormStep::COUNT
    );

    match step {
        FormStep::Welcome { name } => {
            let _ = write!(
                body,
                r#"<h1>Hallo! Ik ben zo blij dat je er bent!</h1>
<p class="sub-text">Voordat we beginnen, wat is je naam?</p>
<form method="post" action="/">
<input type="hidden" name="step" value="welcome">
<input type="text" name="name" value="{}" placeholder="Type je naam hier..." class="name-input" autofocus>
<button type="submit" name="action" value="continue" class="continue-btn">OK ✓</button>
</form>"#,
                escape_html(name)
            );
        }
        FormStep::Question { name, answer } => {
            let checked = |a: Answer| if *answer == Some(a) { " checked" } else { "" };
            let _ = write!(
                body,
                r#"<h1>Hoi {name}!</h1>
<h2>{question}</h2>
{details}
<form method="post" action="/">
<input type="hidden" name="step" value="question">
<input type="hidden" name="name" value="{name}">
<label class="option-btn"><input type="radio" name="response" value="Ja"{yes}> Ja! Ik kom graag!</label>
<label class="option-btn"><input type="radio" name="response" value="Nee"{no}> Nee, helaas kan ik niet</label>
<div class="navigation">
<button type="submit" name="action" value="back" class="back-btn">← Terug</button>
<button type="submit" name="action" value="submit" class="continue-btn">Verstuur ✓</button>
</div>
</form>"#,
                name = escape_html(name),
                question = escape_html(&event.question),
                details = render_event_details(event),
                yes = checked(Answer::Yes),
                no = checked(Answer::No),
            );
        }
        FormStep::Thanks { name, answer } => {
            let (heading, text) = match answer {
                Answer::Yes => (
                    "Geweldig",
                    "We kunnen niet wachten om je te zien! Tot dan!",
                ),
                Answer::No => (
                    "Bedankt",
                    "Bedankt voor je eerlijke antwoord. We zullen je missen, maar we begrijpen het!",
                ),
            };
            let _ = write!(
                body,
                r#"<h1>{}, {}!</h1>
<p class="sub-text">{}</p>"#,
                heading,
                escape_html(name),
                text
            );
            if !event.contact.is_empty() || !event.signature.is_empty() {
                body.push_str(r#"<div class="final-message">"#);
                if !event.contact.is_empty() {
                    let _ = write!(body, "<p>Voor vragen: {}</p>", escape_html(&event.contact));
                }
                if !event.signature.is_empty() {
                    let _ = write!(body, r#"<p class="signature">{}</p>"#, escape_html(&event.signature));
                }
                body.push_str("</div>");
            }
        }
    }

    if let Some(error) = error {
        let _ = write!(body, r#"<p class="error">{}</p>"#, escape_html(error));
    }

    layout(&event.title, &body)
}

fn render_event_details(event: &EventDetails) -> String {
    let mut details = format!(r#"<div class="event-info"><h3>{}</h3>"#, escape_html(&event.name));
    for line in [&event.location, &event.date, &event.time] {
        if !line.is_empty() {
            let _ = write!(details, "<p>{}</p>", escape_html(line));
        }
    }
    details.push_str("</div>");
    details
}

/// Render the admin dashboard for a set of records
pub fn render_dashboard(records: &[RsvpRecord]) -> String {
    let tally = Tally::from_records(records);
    let mut body = dashboard_header(Some(&tally));

    body.push_str(r#"<ul class="rsvp-list">"#);
    for record in records {
        let classification = record.classification();
        let (class, badge) = match classification {
            Classification::Yes => ("rsvp yes", "Ja".to_string()),
            Classification::No => ("rsvp no", "Nee".to_string()),
            Classification::Unknown => (
                "rsvp",
                record
                    .response
                    .clone()
                    .or_else(|| record.status.clone())
                    .unwrap_or_else(|| "—".to_string()),
            ),
        };

        let _ = write!(
            body,
            r#"<li class="{}"><div class="rsvp-head"><strong class="name">{}</strong><span class="badge">{}</span></div><div class="rsvp-meta">"#,
            class,
            escape_html(record.display_name().unwrap_or("—")),
            escape_html(&badge)
        );
        for meta in [&record.email, &record.phone, &record.timestamp]
            .into_iter()
            .flatten()
        {
            let _ = write!(body, "<span>{}</span>", escape_html(meta));
        }
        body.push_str("</div>");

        if let Some(message) = record.message.as_deref().filter(|m| !m.is_empty()) {
            let _ = write!(body, r#"<p class="note">{}</p>"#, escape_html(message));
        }
        if record.name.as_deref().unwrap_or_default().is_empty() {
            let raw = serde_json::to_string_pretty(record).unwrap_or_default();
            let _ = write!(body, r#"<pre class="raw">{}</pre>"#, escape_html(&raw));
        }
        body.push_str("</li>");
    }
    if records.is_empty() {
        body.push_str(r#"<li class="muted">No RSVPs yet.</li>"#);
    }
    body.push_str("</ul>");

    layout("RSVP Admin", &body)
}

/// Render the dashboard's error state
pub fn render_dashboard_error(error: &str) -> String {
    let mut body = dashboard_header(None);
    let _ = write!(body, r#"<p class="error">Error: {}</p>"#, escape_html(error));
    layout("RSVP Admin", &body)
}

fn dashboard_header(tally: Option<&Tally>) -> String {
    let count = |value: Option<usize>| value.map_or_else(|| "—".to_string(), |v| v.to_string());

    format!(
        r#"<header class="admin-header"><h1>RSVP Admin</h1><a class="reload" href="/admin">Reload</a></header>
<section class="stats">
<div class="stat"><div class="stat-label">Total</div><div class="stat-value" id="total">{}</div></div>
<div class="stat yes"><div class="stat-label">Yes</div><div class="stat-value" id="yes">{}</div></div>
<div class="stat no"><div class="stat-label">No</div><div class="stat-value" id="no">{}</div></div>
</section>"#,
        count(tally.map(|t| t.total)),
        count(tally.map(|t| t.yes)),
        count(tally.map(|t| t.no)),
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="nl">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body><main class="content-wrapper">{}</main></body>
</html>"#,
        escape_html(title),
        STYLE,
        body
    )
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = r#"
body { font-family: 'Inter', -apple-system, 'Segoe UI', sans-serif; margin: 0; background: linear-gradient(135deg, #a8c8a8 0%, #c8d8c8 100%); min-height: 100vh; color: white; }
.content-wrapper { max-width: 600px; margin: 0 auto; padding: 40px 20px; }
.step-indicator { color: rgba(255,255,255,0.7); font-size: 14px; margin-bottom: 40px; }
h1 { font-size: 2.2rem; line-height: 1.2; }
.sub-text { font-size: 1.1rem; color: rgba(255,255,255,0.85); }
.name-input { width: 100%; background: transparent; border: none; border-bottom: 3px solid rgba(255,255,255,0.3); padding: 15px 0; font-size: 1.3rem; color: white; outline: none; }
.event-info, .final-message { background: rgba(255,255,255,0.1); border-radius: 20px; padding: 30px; margin: 30px 0; }
.option-btn { display: block; background: rgba(255,255,255,0.1); border: 2px solid rgba(255,255,255,0.2); border-radius: 15px; padding: 20px 25px; margin: 15px 0; cursor: pointer; }
.navigation { display: flex; justify-content: space-between; gap: 20px; margin-top: 30px; }
.continue-btn, .back-btn { background: white; color: #2d5a2d; border: none; border-radius: 12px; padding: 15px 30px; font-weight: 600; cursor: pointer; }
.back-btn { background: transparent; color: white; border: 2px solid rgba(255,255,255,0.3); }
.error { color: #fecaca; }
.muted { color: #94a3b8; }
.admin-header { display: flex; justify-content: space-between; align-items: center; }
.stats { display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; margin-bottom: 20px; }
.stat, .rsvp { background: #111827; border-radius: 14px; padding: 14px; list-style: none; }
.stat.yes .stat-value { color: #22c55e; }
.stat.no .stat-value { color: #ef4444; }
.rsvp-list { display: grid; gap: 12px; padding: 0; }
.rsvp-meta span { margin-right: 12px; color: #94a3b8; }
.raw { font-size: 12px; white-space: pre-wrap; }
"#;
