//! Standalone HTML page wrapping an embed snippet.

const PAGE_TITLE: &str = "Chatbot Preview";

/// Wrap `snippet` in a complete HTML document that can be opened directly.
pub fn wrap_as_standalone_html(snippet: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{PAGE_TITLE}</title>
</head>
<body>
  <h1>{PAGE_TITLE}</h1>
  <p>The chatbot widget is in the bottom-right corner of this page.</p>
{snippet}
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_page_structure() {
        let page = wrap_as_standalone_html("<div id=\"custom-chatbot\"></div>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"<meta charset="UTF-8">"#));
        assert!(page.contains(r#"<meta name="viewport""#));
        assert!(page.contains("<title>Chatbot Preview</title>"));
        assert!(page.contains("<h1>Chatbot Preview</h1>"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_snippet_inside_body() {
        let snippet = "<!-- marker -->";
        let page = wrap_as_standalone_html(snippet);
        let body_start = page.find("<body>").unwrap();
        let body_end = page.find("</body>").unwrap();
        let at = page.find(snippet).unwrap();
        assert!(body_start < at && at < body_end);
    }
}
