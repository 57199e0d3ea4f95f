//! Static document loaded into the panel before any data arrives.

/// Title of the panel.
pub const PANEL_TITLE: &str = "Project Structure Graph";

/// Placeholder shown until `load-data` arrives.
pub const LOADING_TEXT: &str = "Loading project structure...";

/// Script bundle the shell loads, relative to the panel's resource root.
pub const SCRIPT_PATH: &str = "assets/index.js";

/// Fresh script nonce: a v4 UUID without dashes.
#[must_use]
pub fn new_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Builds the shell document. Only scripts carrying `nonce` may run.
#[must_use]
pub fn shell_html(nonce: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta http-equiv="Content-Security-Policy" content="default-src 'none'; style-src 'unsafe-inline'; script-src 'nonce-{nonce}';">
  <title>{PANEL_TITLE}</title>
  <style>
    body {{ margin: 0; padding: 0; height: 100vh; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }}
    #root {{ height: 100vh; }}
    .loading {{ display: flex; justify-content: center; align-items: center; height: 100vh; font-size: 18px; }}
  </style>
</head>
<body>
  <div id="root">
    <div class="loading">{LOADING_TEXT}</div>
  </div>
  <script nonce="{nonce}" src="{SCRIPT_PATH}"></script>
</body>
</html>
"#
    )
}
