/// Index page shell, Nord palette. Rendering substitutes the two section
/// markers rather than using `format!` so the CSS braces stay literal.
const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <meta name="color-scheme" content="dark" />
  <title>Guster Generator</title>
  <style>
    :root {
      --nord0: #2e3440;
      --nord1: #3b4252;
      --nord4: #d8dee9;
      --nord6: #eceff4;
      --nord8: #88c0d0;
      --nord9: #81a1c1;
      --nord10: #5e81ac;
      --radius: clamp(0.6rem, 1.2vw, 1rem);
      --space: clamp(0.9rem, 2vw, 1.35rem);
    }
    * { box-sizing: border-box; }
    html, body { height: 100%; }
    body {
      margin: 0;
      font-family: "Segoe UI Variable", "Segoe UI", "Inter", system-ui, sans-serif;
      background:
        radial-gradient(1000px 680px at 8% 8%, rgba(94, 129, 172, 0.34), transparent 60%),
        radial-gradient(780px 560px at 92% 92%, rgba(136, 192, 208, 0.2), transparent 62%),
        var(--nord0);
      color: var(--nord6);
      display: grid;
      place-items: center;
      padding: clamp(0.75rem, 1.9vw, 1.4rem);
    }
    .container {
      width: min(100%, 70rem);
      display: grid;
      gap: var(--space);
      text-align: center;
      background: linear-gradient(180deg, rgba(59, 66, 82, 0.93), rgba(46, 52, 64, 0.98));
      border: 1px solid rgba(216, 222, 233, 0.16);
      border-radius: var(--radius);
      box-shadow: 0 1rem 2rem rgba(0, 0, 0, 0.35);
      padding: clamp(1rem, 2.2vw, 1.8rem);
      backdrop-filter: blur(6px);
    }
    .app-label {
      margin: 0;
      font-size: 0.72rem;
      font-weight: 650;
      text-transform: uppercase;
      letter-spacing: 0.16em;
      color: var(--nord4);
      opacity: 0.82;
    }
    .nickname {
      margin: 0;
      font-size: clamp(1.1rem, 2.9vw, 2rem);
      font-weight: 700;
      color: var(--nord8);
      overflow-wrap: anywhere;
      line-height: 1.2;
    }
    .image-frame {
      margin: 0;
      width: 100%;
      min-height: clamp(14rem, 44vh, 36rem);
      display: grid;
      place-items: center;
      border-radius: calc(var(--radius) - 0.1rem);
      border: 1px solid rgba(216, 222, 233, 0.18);
      overflow: hidden;
      background: var(--nord1);
    }
    img {
      display: block;
      width: 100%;
      height: auto;
      max-height: min(72vh, 56rem);
      object-fit: contain;
    }
    form { margin: 0; }
    button {
      width: min(100%, 18rem);
      border: 1px solid rgba(216, 222, 233, 0.26);
      border-radius: 999px;
      padding: 0.8rem 1.2rem;
      font: inherit;
      font-weight: 700;
      letter-spacing: 0.01em;
      color: var(--nord6);
      background:
        linear-gradient(165deg, rgba(136, 192, 208, 0.2), rgba(46, 52, 64, 0)) padding-box,
        linear-gradient(135deg, var(--nord10), var(--nord9)) border-box;
      box-shadow: 0 0.45rem 1.2rem rgba(94, 129, 172, 0.35);
      cursor: pointer;
      transition: filter 140ms ease, transform 140ms ease, box-shadow 140ms ease;
    }
    button:hover {
      filter: brightness(1.08);
      box-shadow: 0 0.65rem 1.35rem rgba(129, 161, 193, 0.42);
    }
    button:active { transform: translateY(1px); }
    button:focus-visible {
      outline: 2px solid var(--nord8);
      outline-offset: 2px;
    }
    code {
      background: rgba(229, 233, 240, 0.12);
      border-radius: 0.35rem;
      padding: 0.08rem 0.34rem;
      color: var(--nord4);
    }
    .empty { color: var(--nord4); }
  </style>
</head>
<body>
  <main class="container">
    <p class="app-label">Guster Nickname Generator</p>
    {nickname_html}
    {image_html}
  </main>
</body>
</html>"#;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
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

/// Render the index page. `recent` rides along as a hidden JSON token so the
/// next request can avoid repeats without any server-side session state.
pub fn render_page(image_url: Option<&str>, nickname: Option<&str>, recent: &[String]) -> String {
    let serialized_recent =
        escape_html(&serde_json::to_string(recent).unwrap_or_else(|_| "[]".to_string()));

    let nickname_html = match nickname {
        Some(nickname) => format!(
            "<h1 class=\"nickname\">{}</h1>",
            escape_html(nickname)
        ),
        None => "<h1 class=\"nickname empty\">No nicknames found in <code>data/nicknames.txt</code>.</h1>"
            .to_string(),
    };

    let button = format!(
        "<input type=\"hidden\" name=\"previous_nickname\" value=\"{}\" />\
         <input type=\"hidden\" name=\"recent_images\" value=\"{}\" />\
         <button type=\"submit\">C&#39;mon, son. Another one.</button>",
        escape_html(nickname.unwrap_or("")),
        serialized_recent
    );

    let image_html = match image_url {
        Some(url) => format!(
            "<figure class=\"image-frame\">\
             <img src=\"{}\" alt=\"Random Guster image\" loading=\"eager\" decoding=\"async\" />\
             </figure>\
             <form method=\"post\">{}</form>",
            escape_html(url),
            button
        ),
        None => format!(
            "<p class=\"empty\">No images available. Add URLs to <code>data/image_urls.txt</code> \
             or check the curation log.</p>\
             <form method=\"post\">{}</form>",
            button
        ),
    };

    PAGE_TEMPLATE
        .replace("{nickname_html}", &nickname_html)
        .replace("{image_html}", &image_html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Gus & 'Shawn'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Gus &amp; &#39;Shawn&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_page_escapes_nickname() {
        let page = render_page(None, Some("MC <Clap> Your Handz"), &[]);
        assert!(page.contains("MC &lt;Clap&gt; Your Handz"));
        assert!(!page.contains("MC <Clap> Your Handz"));
    }

    #[test]
    fn test_render_page_embeds_recent_token() {
        let recent = vec!["https://a.jpg".to_string()];
        let page = render_page(Some("https://b.jpg"), Some("Gus"), &recent);
        assert!(page.contains("name=\"recent_images\""));
        assert!(page.contains("[&quot;https://a.jpg&quot;]"));
        assert!(page.contains("src=\"https://b.jpg\""));
    }

    #[test]
    fn test_render_page_shows_empty_states() {
        let page = render_page(None, None, &[]);
        assert!(page.contains("No images available"));
        assert!(page.contains("No nicknames found"));
        // The reload form still renders so the visitor can retry
        assert!(page.contains("<form method=\"post\">"));
    }
}
