use crate::models::SessionView;

pub fn render_index(view: &SessionView, notice: Option<&str>) -> String {
    let link = view.short_link.as_deref().unwrap_or_default();
    let disabled = if view.loading { "disabled" } else { "" };

    INDEX_HTML
        .replace("{{SPINNER}}", SPINNER)
        .replace("{{DISABLED}}", disabled)
        .replace("{{SUBMIT_LABEL}}", button_label(view.loading, "Shorten"))
        .replace("{{ANALYTICS_LABEL}}", button_label(view.loading, "View Analytics"))
        .replace("{{ERROR_HIDDEN}}", hidden(view.error.is_none()))
        .replace("{{RESULT_HIDDEN}}", hidden(view.short_id.is_none()))
        .replace("{{CLICKS_HIDDEN}}", hidden(view.clicks.is_none()))
        .replace("{{CLICKS}}", &view.clicks.map(|n| n.to_string()).unwrap_or_default())
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{ERROR}}", &escape_html(view.error.as_deref().unwrap_or_default()))
        .replace("{{LINK}}", &escape_html(link))
        .replace("{{SOURCE_URL}}", &escape_html(&view.source_url))
}

fn hidden(is_hidden: bool) -> &'static str {
    if is_hidden { "hidden" } else { "" }
}

fn button_label(loading: bool, label: &'static str) -> &'static str {
    if loading { SPINNER } else { label }
}

fn render_notice(notice: Option<&str>) -> String {
    match notice {
        Some(message) => format!(
            r#"<dialog class="notice" open>
      <form method="dialog">
        <p>{}</p>
        <button class="btn-main" type="submit">OK</button>
      </form>
    </dialog>"#,
            escape_html(message)
        ),
        None => String::new(),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const SPINNER: &str = r#"<svg class="spinner" xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" aria-label="Loading"><circle cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4" opacity="0.25"></circle><path fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z"></path></svg>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>URL Shortener</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    [hidden] {
      display: none !important;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(640px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
      animation: rise 600ms ease;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
      text-align: center;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
      text-align: center;
    }

    .shorten {
      display: flex;
      align-items: stretch;
      background: white;
      border-radius: 999px;
      border: 1px solid rgba(47, 72, 88, 0.12);
      overflow: hidden;
    }

    .scheme {
      display: flex;
      align-items: center;
      padding: 0 14px 0 20px;
      color: #8b857d;
      background: rgba(47, 72, 88, 0.05);
    }

    .shorten input {
      flex: 1;
      min-width: 0;
      border: none;
      padding: 16px;
      font: inherit;
      color: inherit;
      outline: none;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 22px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 10px;
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button:disabled {
      opacity: 0.6;
      cursor: progress;
    }

    .btn-main {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    .btn-alt {
      background: var(--accent-2);
      color: white;
    }

    .spinner {
      width: 20px;
      height: 20px;
      animation: spin 900ms linear infinite;
    }

    .error {
      background: #fde8e4;
      color: #c63b2b;
      border-radius: 16px;
      padding: 14px 18px;
    }

    .result {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 14px;
    }

    .result .label {
      margin: 0;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .link-row {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .link-row a {
      color: var(--accent-2);
      font-weight: 600;
      word-break: break-all;
    }

    .clicks {
      margin: 0;
      font-size: 1.1rem;
    }

    .clicks strong {
      color: var(--accent);
    }

    .notice {
      border: none;
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 20px 24px;
      text-align: center;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>URL Shortener</h1>
      <p class="subtitle">Transform your long URLs into concise, shareable links.</p>
    </header>

    <form id="shorten-form" class="shorten" method="post" action="/shorten">
      <span class="scheme">https://</span>
      <input id="url" name="url" type="text" value="{{SOURCE_URL}}"
        placeholder="Paste a long URL here" aria-label="Enter long URL" />
      <button class="btn-main" id="shorten-btn" type="submit" {{DISABLED}}>{{SUBMIT_LABEL}}</button>
    </form>

    <div class="error" id="error" role="alert" {{ERROR_HIDDEN}}>{{ERROR}}</div>

    <section class="result" id="result" {{RESULT_HIDDEN}}>
      <p class="label">Your shortened URL:</p>
      <div class="link-row">
        <a id="short-link" href="{{LINK}}" target="_blank" rel="noopener noreferrer"
          aria-label="Go to shortened URL: {{LINK}}">{{LINK}}</a>
        <form id="copy-form" method="post" action="/copy">
          <button class="btn-alt" id="copy-btn" type="submit">Copy</button>
        </form>
      </div>
      <form id="analytics-form" method="post" action="/analytics">
        <button class="btn-main" id="analytics-btn" type="submit" {{DISABLED}}>{{ANALYTICS_LABEL}}</button>
      </form>
      <p class="clicks" id="clicks" {{CLICKS_HIDDEN}}>Total clicks: <strong id="clicks-value">{{CLICKS}}</strong></p>
    </section>

    {{NOTICE}}
  </main>

  <template id="spinner">{{SPINNER}}</template>

  <script>
    const urlInput = document.getElementById('url');
    const shortenBtn = document.getElementById('shorten-btn');
    const analyticsBtn = document.getElementById('analytics-btn');
    const errorEl = document.getElementById('error');
    const resultEl = document.getElementById('result');
    const linkEl = document.getElementById('short-link');
    const clicksEl = document.getElementById('clicks');
    const clicksValueEl = document.getElementById('clicks-value');
    const spinner = document.getElementById('spinner').innerHTML;

    const labels = new Map([
      [shortenBtn, 'Shorten'],
      [analyticsBtn, 'View Analytics']
    ]);

    const setLoading = (loading) => {
      labels.forEach((label, button) => {
        button.disabled = loading;
        button.innerHTML = loading ? spinner : label;
      });
    };

    const setError = (message) => {
      errorEl.textContent = message || '';
      errorEl.hidden = !message;
    };

    const render = (view) => {
      resultEl.hidden = !view.short_link;
      if (view.short_link) {
        linkEl.href = view.short_link;
        linkEl.textContent = view.short_link;
        linkEl.setAttribute('aria-label', `Go to shortened URL: ${view.short_link}`);
      }
      clicksEl.hidden = view.clicks === null;
      clicksValueEl.textContent = view.clicks === null ? '' : String(view.clicks);
      setError(view.error);
    };

    const run = async (path, body) => {
      setError('');
      setLoading(true);
      try {
        const res = await fetch(path, {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(body || {})
        });
        if (!res.ok) {
          setError(await res.text());
          return;
        }
        render(await res.json());
      } catch (err) {
        setError(err.message);
      } finally {
        setLoading(false);
      }
    };

    document.getElementById('shorten-form').addEventListener('submit', (event) => {
      event.preventDefault();
      run('/api/shorten', { url: urlInput.value });
    });

    document.getElementById('analytics-form').addEventListener('submit', (event) => {
      event.preventDefault();
      run('/api/analytics');
    });

    document.getElementById('copy-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      let link;
      try {
        const res = await fetch('/api/copy', { method: 'POST' });
        if (!res.ok) {
          alert(await res.text());
          return;
        }
        link = (await res.json()).link;
      } catch (err) {
        console.error('Failed to copy: ', err);
        alert('Failed to copy URL.');
        return;
      }
      navigator.clipboard
        .writeText(link)
        .then(() => alert('Shortened URL copied to clipboard!'))
        .catch((err) => {
          console.error('Failed to copy: ', err);
          alert('Failed to copy URL.');
        });
    });
  </script>
</body>
</html>
"#;
