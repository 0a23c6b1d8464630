//! Transcript markdown rendering
//!
//! The report arrives as markdown text. Raw HTML inside it is turned into
//! text so it is escaped on output; nothing from the analysis service is
//! injected into the page as markup.

use pulldown_cmark::{html, Event, Options, Parser};

/// Render markdown to an HTML fragment
///
/// Safe to call on a partial transcript: an unterminated construct simply
/// renders as whatever it parses to so far.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, events);
    output
}
