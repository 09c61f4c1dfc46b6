//! Server-rendered HTML pages.
//!
//! Every dynamic value goes through [`escape`]; model output goes through
//! [`render_markdown`], which drops raw HTML.

use journalist_rs::agent::newsroom::Drafts;
use journalist_rs::agent::request::{MAX_LINKS, WordLimit};
use pulldown_cmark::{Event, Options, Parser, html};

use crate::form::FormState;
use crate::session::Flash;

const TITLE: &str = "AI Journalist";
const CAPTION: &str = "Generate high-quality articles with AI Journalist by researching, \
                       writing, and editing articles using GPT-4o.";
const SPINNER_TEXT: &str = "Good things take time, and we're making sure it's perfect for you!";
const PLACEHOLDER_CAPTION: &str = "Your generated article will be displayed here.";

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Render markdown to HTML. Raw HTML in the source is shown as text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{TITLE}</title>
<link rel="icon" href="/assets/logo.svg">
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<div class="logo"><img src="/assets/logo.svg" alt="AI Journalist" width="150" height="60"></div>
<main>
{body}
</main>
<script src="/assets/app.js"></script>
</body>
</html>
"#
    )
}

fn flash_html(flash: Option<&Flash>) -> String {
    match flash {
        Some(Flash::Success(msg)) => format!(r#"<p class="flash success">{}</p>"#, escape(msg)),
        Some(Flash::Error(msg)) => format!(r#"<p class="flash error">{}</p>"#, escape(msg)),
        None => String::new(),
    }
}

/// The login form.
pub fn login_page(flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<section class="card login">
<h1>Login</h1>
{flash}
<form method="post" action="/login">
<label>Username <input type="text" name="username" autocomplete="username"></label>
<label>Password <input type="password" name="password" autocomplete="current-password"></label>
<button type="submit" class="wide">Login</button>
</form>
</section>"#,
        flash = flash_html(flash),
    );
    layout(&body)
}

fn word_limit_input(value: WordLimit) -> String {
    format!(
        r#"<label>How long should be your article? <output id="word-limit-value">{value}</output>
<input type="range" name="word_limit" id="word_limit" min="{min}" max="{max}" step="{step}" value="{value}"></label>"#,
        min = WordLimit::MIN,
        max = WordLimit::MAX,
        step = WordLimit::STEP,
    )
}

fn links_fieldset(form: &FormState) -> String {
    let checked = |yes: bool| if form.use_links == yes { " checked" } else { "" };
    let fields: String = form
        .links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let n = i + 1;
            let hidden = if n > form.num_links { " hidden" } else { "" };
            format!(
                r#"<label class="link-field" data-index="{n}"{hidden}>Enter reference link {n} <input type="url" name="link_{n}" value="{value}"></label>
"#,
                value = escape(link),
            )
        })
        .collect();
    format!(
        r#"<fieldset class="links">
<legend>Do you want to provide reference links?</legend>
<label><input type="radio" name="use_links" value="no"{no}> No</label>
<label><input type="radio" name="use_links" value="yes"{yes}> Yes</label>
<div class="link-inputs"{hide_all}>
<label title="These links will be used to curate your news article.">How many links do you want to provide?
<input type="number" name="num_links" id="num_links" min="1" max="{max}" step="1" value="{num}"></label>
{fields}</div>
</fieldset>"#,
        no = checked(false),
        yes = checked(true),
        hide_all = if form.use_links { "" } else { " hidden" },
        max = MAX_LINKS,
        num = form.num_links,
    )
}

fn output_pane(drafts: Option<&Drafts>) -> String {
    match drafts {
        Some(d) => format!(
            r#"<article class="markdown">{html}</article>
<textarea id="article-markdown" hidden>{raw}</textarea>
<button type="button" class="copy" data-copy-target="article-markdown">Copy</button>"#,
            html = render_markdown(d.article()),
            raw = escape(d.article()),
        ),
        None => format!(
            r#"<figure class="placeholder"><img src="/assets/stock.svg" width="350" alt="">
<figcaption>{PLACEHOLDER_CAPTION}</figcaption></figure>"#
        ),
    }
}

fn drafts_panel(drafts: Option<&Drafts>) -> String {
    let stage = |label: &str, text: Option<&str>| match text {
        Some(t) => format!(
            r#"<details><summary>{label} Draft</summary><div class="markdown">{}</div></details>"#,
            render_markdown(t)
        ),
        None => format!(
            r#"<details><summary>{label} Draft</summary><p class="muted">Generate an article to get {lower} response.</p></details>"#,
            lower = label.to_lowercase()
        ),
    };
    format!(
        r#"<section class="card drafts">
<h2>Agent Draft Responses</h2>
<p class="muted">The draft of response by each agent</p>
{}
{}
{}
</section>"#,
        stage("Planner", drafts.map(|d| d.planner.as_str())),
        stage("Writer", drafts.map(|d| d.writer.as_str())),
        stage("Editor", drafts.map(|d| d.editor.as_str())),
    )
}

/// The logged-in page: generation form, output pane, drafts.
pub fn generator_page(
    form: &FormState,
    drafts: Option<&Drafts>,
    flash: Option<&Flash>,
    generating: bool,
) -> String {
    let busy = if generating {
        r#"<p class="flash info">An article is being generated for this session.</p>"#
    } else {
        ""
    };
    let body = format!(
        r#"<header class="title">
<h1>{TITLE}&#x1F5DE;&#xFE0F;</h1>
<p class="caption">{CAPTION}</p>
<form method="post" action="/logout"><button type="submit">Logout</button></form>
</header>
<div class="columns">
<section class="card">
<h2>Input &amp; Configuration</h2>
{flash}{busy}
<form method="post" action="/generate" id="generate-form">
<label>What do you want the AI journalist to write an article on?
<input type="text" name="topic" placeholder="E.g: Emergence of AI and LLMs." value="{topic}"></label>
{word_limit}
{links}
<button type="submit" id="generate">Generate Article</button>
<p class="spinner" hidden>{SPINNER_TEXT}</p>
</form>
</section>
<section class="card output">
{output}
</section>
</div>
{drafts}"#,
        flash = flash_html(flash),
        topic = escape(&form.topic),
        word_limit = word_limit_input(form.word_limit),
        links = links_fieldset(form),
        output = output_pane(drafts),
        drafts = drafts_panel(drafts),
    );
    layout(&body)
}

/// Shown when article generation fails.
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<section class="card error">
<h1>Article generation failed</h1>
<pre>{}</pre>
<p><a href="/">Back to the journalist</a></p>
</section>"#,
        escape(message)
    );
    layout(&body)
}
