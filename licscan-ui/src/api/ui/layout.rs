//! Shared page shell

use crate::api::buildinfo::BuildInfo;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Wrap page content in the common document
///
/// `body` is trusted markup; callers escape anything user-supplied.
pub(super) fn page(title: &str, body: &str, scripts: &[&str]) -> String {
    let build = BuildInfo::current();

    let script_tags: String = scripts
        .iter()
        .map(|src| format!(r#"    <script src="{}"></script>"#, src))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - licscan</title>
    <link rel="stylesheet" href="/static/licscan.css">
</head>
<body>
    <header>
        <h1>licscan</h1>
        <div class="subtitle">Dependency license analysis</div>
    </header>
    <main class="container">
{body}
    </main>
    <footer class="build-info">v{version} [{git_hash}] ({build_profile})</footer>
{script_tags}
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
        version = build.version,
        git_hash = build.git_hash,
        build_profile = build.build_profile,
        script_tags = script_tags,
    )
}
