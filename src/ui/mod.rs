use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::app::AppState;

const BASE_PLACEHOLDER: &str = "__PUBLIC_BASE_URL__";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Google Photos Direct Downloader</title>
  <style>
    :root { --primary: #4285f4; --primary-dark: #2b6cd4; --bg: #f8f9fa; --text: #202124; }
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: 'Segoe UI', Arial, sans-serif; background: var(--bg); color: var(--text); }
    .container { max-width: 800px; margin: 60px auto; padding: 2rem; background: #fff;
                 border-radius: 12px; box-shadow: 0 4px 6px rgba(0,0,0,0.05); }
    .input-field { width: 100%; margin: 2rem 0 1rem; padding: 1rem; font-size: 1rem;
                   border: 2px solid #e0e0e0; border-radius: 8px; }
    .input-field:focus { outline: none; border-color: var(--primary); }
    .btn { background: var(--primary); color: #fff; padding: 1rem 2rem; border: none;
           border-radius: 8px; font-size: 1rem; cursor: pointer; }
    .btn:hover { background: var(--primary-dark); }
    #result { margin-top: 2rem; }
    .result-success { padding: 1.5rem; border-radius: 8px; background: #e8f0fe; border: 2px solid var(--primary); }
    .result-error { padding: 1.5rem; border-radius: 8px; background: #fce8e6; border: 2px solid #d93025; }
    .download-link { display: block; margin-bottom: 1rem; color: var(--primary); font-weight: 500; word-break: break-all; }
  </style>
</head>
<body>
  <div class="container">
    <h1>Google Photos Direct Downloader</h1>
    <p>Get direct download links for your Google Photos shared videos.</p>
    <input type="text" id="photoUrl" class="input-field" placeholder="Paste your Google Photos share link here...">
    <button id="generate" class="btn">Generate Download Link</button>
    <div id="result"></div>
  </div>
  <script>
    const PUBLIC_BASE_URL = __PUBLIC_BASE_URL__ || window.location.origin;
    const resultDiv = document.getElementById("result");

    function showError(message) {
      resultDiv.innerHTML = "";
      const box = document.createElement("div");
      box.className = "result-error";
      box.textContent = message;
      resultDiv.appendChild(box);
    }

    function showLink(proxyLink) {
      resultDiv.innerHTML = "";
      const box = document.createElement("div");
      box.className = "result-success";
      const link = document.createElement("a");
      link.className = "download-link";
      link.href = proxyLink;
      link.target = "_blank";
      link.textContent = "Download Now";
      const copy = document.createElement("button");
      copy.className = "btn";
      copy.textContent = "Copy Link";
      copy.onclick = () => navigator.clipboard.writeText(PUBLIC_BASE_URL + proxyLink);
      box.append(link, copy);
      resultDiv.appendChild(box);
    }

    document.getElementById("generate").onclick = async () => {
      const url = document.getElementById("photoUrl").value.trim();
      if (!url) {
        showError("Please enter a valid Google Photos URL");
        return;
      }
      resultDiv.innerHTML = '<div class="result-success">Processing your request...</div>';
      try {
        const response = await fetch("/api", {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify({ url })
        });
        const data = await response.json();
        if (data.proxy_link) {
          showLink(data.proxy_link);
        } else {
          showError(data.error || "Failed to generate download link");
        }
      } catch (e) {
        showError("Connection error. Please try again");
      }
    };
  </script>
</body>
</html>
"#;

/// The single static page, served for every path the API doesn't own.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(state.public_base_url.as_deref()))
}

fn render_index(public_base_url: Option<&str>) -> String {
    // A JS literal: `null` or a JSON string with `</` broken up
    let base = serde_json::to_string(&public_base_url.map(|b| b.trim_end_matches('/')))
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    INDEX_HTML.replace(BASE_PLACEHOLDER, &base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_base_url() {
        let html = render_index(None);
        assert!(html.contains("const PUBLIC_BASE_URL = null || window.location.origin;"));
        assert!(!html.contains(BASE_PLACEHOLDER));
    }

    #[test]
    fn test_render_with_base_url() {
        let html = render_index(Some("https://dl.example.com/"));
        assert!(html.contains(r#"const PUBLIC_BASE_URL = "https://dl.example.com" ||"#));
    }

    #[test]
    fn test_render_escapes_script_close() {
        let html = render_index(Some("https://x/</script><script>alert(1)"));
        assert!(!html.contains("</script><script>alert(1)"));
    }
}
