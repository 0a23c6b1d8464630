//! Login and registration pages

use super::layout::{escape_html, page};
use crate::controllers::FormView;

/// GET /login, and POST /login when the form is shown again
pub fn render_login_page(view: &FormView) -> String {
    let body = format!(
        r#"        <section class="card auth-card">
            <h2>Log in</h2>
            {message}
            <form method="post" action="/login">
                <label for="username">Username</label>
                <input id="username" name="username" type="text" value="{username}" autocomplete="username" required>
                <label for="password">Password</label>
                <input id="password" name="password" type="password" autocomplete="current-password" required>
                <button type="submit"{disabled}>Log in</button>
            </form>
            <p class="alt-link">No account yet? <a href="/register">Register</a></p>
        </section>"#,
        message = message_block(view),
        username = escape_html(&view.username),
        disabled = disabled_attr(view),
    );
    page("Log in", &body, &[])
}

/// GET /register, and POST /register when the form is shown again
pub fn render_register_page(view: &FormView) -> String {
    let body = format!(
        r#"        <section class="card auth-card">
            <h2>Create account</h2>
            {message}
            <form method="post" action="/register">
                <label for="username">Username</label>
                <input id="username" name="username" type="text" value="{username}" autocomplete="username" required>
                <label for="password">Password</label>
                <input id="password" name="password" type="password" autocomplete="new-password" required>
                <label for="confirm_password">Confirm password</label>
                <input id="confirm_password" name="confirm_password" type="password" autocomplete="new-password" required>
                <button type="submit"{disabled}>Register</button>
            </form>
            <p class="alt-link">Already registered? <a href="/login">Log in</a></p>
        </section>"#,
        message = message_block(view),
        username = escape_html(&view.username),
        disabled = disabled_attr(view),
    );
    page("Register", &body, &[])
}

// At most one message is ever shown
fn message_block(view: &FormView) -> String {
    match view.message() {
        Some(message) => format!(
            r#"<div class="message error" role="alert">{}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    }
}

fn disabled_attr(view: &FormView) -> &'static str {
    if view.is_submitting() {
        " disabled"
    } else {
        ""
    }
}
