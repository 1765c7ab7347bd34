//! Server-rendered pages.
//!
//! Every page is a plain function from its data to `Html<String>`. All
//! user-supplied text goes through [`escape`] before it is written out.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::database::models::{Item, ItemType};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
        body = body
    ))
}

fn error_block(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

pub fn register_page(error: Option<&str>, username: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Register</h1>
{error}
<form method="post" action="/register">
<label>Username <input name="username" value="{username}" required></label>
<label>Display name <input name="displayName"></label>
<label>Password <input type="password" name="password" required></label>
<label>Confirm password <input type="password" name="confirmPassword" required></label>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        error = error_block(error),
        username = escape(username)
    );
    layout("Register", &body)
}

pub fn login_page(error: Option<&str>, username: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Log in</h1>
{error}
<form method="post" action="/login">
<label>Username <input name="username" value="{username}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/register">Register</a></p>"#,
        error = error_block(error),
        username = escape(username)
    );
    layout("Log in", &body)
}

pub fn crud_page(username: &str, items: &[Item]) -> Html<String> {
    let rows: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<tr>
<td>{title}</td>
<td>{description}</td>
<td>{item_type}</td>
<td>{completed}</td>
<td>{created_at}</td>
<td><a href="/update/{id}">Edit</a>
<form method="post" action="/delete/{id}" style="display:inline"><button type="submit">Delete</button></form></td>
</tr>"#,
                title = escape(&item.title),
                description = escape(&item.description),
                item_type = item.item_type,
                completed = if item.completed { "yes" } else { "no" },
                created_at = item.created_at.format("%Y-%m-%d %H:%M"),
                id = item.id
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Items</h1>
<p>Signed in as {username}. <a href="/logout">Log out</a></p>
<p><a href="/create">New item</a></p>
<table>
<tr><th>Title</th><th>Description</th><th>Type</th><th>Done</th><th>Created</th><th></th></tr>
{rows}
</table>"#,
        username = escape(username),
        rows = rows
    );
    layout("Items", &body)
}

/// Values shown in the create and update forms.
#[derive(Debug, Clone, Default)]
pub struct ItemFormValues {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub completed: bool,
}

impl From<&Item> for ItemFormValues {
    fn from(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            item_type: item.item_type,
            completed: item.completed,
        }
    }
}

fn item_form(heading: &str, action: &str, values: &ItemFormValues, error: Option<&str>) -> Html<String> {
    let options: String = ItemType::ALL
        .iter()
        .map(|t| {
            let selected = if *t == values.item_type { " selected" } else { "" };
            format!(r#"<option value="{t}"{selected}>{t}</option>"#)
        })
        .collect();

    let body = format!(
        r#"<h1>{heading}</h1>
{error}
<form method="post" action="{action}">
<label>Title <input name="title" value="{title}" required></label>
<label>Description <textarea name="description">{description}</textarea></label>
<label>Type <select name="item_type">{options}</select></label>
<label>Completed <input type="checkbox" name="completed"{checked}></label>
<button type="submit">Save</button>
</form>
<p><a href="/crud">Back</a></p>"#,
        heading = escape(heading),
        error = error_block(error),
        action = escape(action),
        title = escape(&values.title),
        description = escape(&values.description),
        options = options,
        checked = if values.completed { " checked" } else { "" }
    );
    layout(heading, &body)
}

pub fn create_page(values: &ItemFormValues, error: Option<&str>) -> Html<String> {
    item_form("New item", "/create", values, error)
}

pub fn update_page(id: &str, values: &ItemFormValues, error: Option<&str>) -> Html<String> {
    item_form("Edit item", &format!("/update/{id}"), values, error)
}

pub fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        r#"<h1>Something went wrong</h1>
<p>{status}</p>
<p>{message}</p>
<p><a href="/crud">Back to items</a></p>"#,
        status = status,
        message = escape(message)
    );
    (status, layout("Error", &body)).into_response()
}
