//! Two-pane HTML shell.
//!
//! The sidebar is plain HTML: each chapter is a `<details name="chapters">`
//! element, so the browser keeps at most one open between navigations, and
//! the rail collapse is a checkbox driven by CSS. The only script handles
//! practice question feedback.

use std::fmt::Write;

use primer_nav::{ChapterView, SidebarView};
use primer_renderer::{TocEntry, escape_html};

use crate::session::ContentPane;

/// URL the stylesheet is served from.
pub const STYLESHEET_PATH: &str = "/assets/primer.css";

/// URL the script is served from.
pub const SCRIPT_PATH: &str = "/assets/primer.js";

/// Shell stylesheet.
pub const STYLESHEET: &str = include_str!("assets/primer.css");

/// Shell script.
pub const SCRIPT: &str = include_str!("assets/primer.js");

/// Render a complete HTML document.
#[must_use]
pub fn render_shell(site_title: &str, sidebar: &SidebarView, pane: &ContentPane) -> String {
    let title = match pane {
        ContentPane::Ready {
            page:
                primer_renderer::ComposedPage {
                    title: Some(page_title),
                    ..
                },
            ..
        } => format!("{} | {}", escape_html(page_title), escape_html(site_title)),
        ContentPane::NotFound { .. } => format!("Not found | {}", escape_html(site_title)),
        _ => escape_html(site_title),
    };

    let mut html = String::with_capacity(8 * 1024);
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{STYLESHEET_PATH}">
<script src="{SCRIPT_PATH}" defer></script>
</head>
<body>
<div class="shell">
"#
    )
    .unwrap();
    html.push_str(&render_sidebar(site_title, sidebar));
    html.push_str("<main class=\"content\" id=\"content\">");
    html.push_str(&render_pane(pane));
    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

/// Render the sidebar.
#[must_use]
pub fn render_sidebar(site_title: &str, sidebar: &SidebarView) -> String {
    let checked = if sidebar.collapsed { " checked" } else { "" };
    let mut html = format!(
        r#"<input type="checkbox" id="sidebar-collapsed" class="sidebar-state"{checked}>
<aside class="sidebar">
<label for="sidebar-collapsed" class="sidebar-handle" role="button" tabindex="0" aria-label="Toggle sidebar"><span class="chevron-left"></span></label>
<div class="sidebar-content">
<a class="site-title" href="/">{}</a>
<nav class="chapters">
"#,
        escape_html(site_title)
    );
    for chapter in &sidebar.chapters {
        render_chapter(&mut html, chapter);
    }
    html.push_str("</nav>\n</div>\n</aside>\n");
    html
}

fn render_chapter(html: &mut String, chapter: &ChapterView) {
    let open = if chapter.expanded { " open" } else { "" };
    write!(
        html,
        r#"<details class="chapter" name="chapters" data-chapter="{id}"{open}>
<summary><span class="chevron" aria-hidden="true"></span><a href="{href}">{title}</a></summary>
<ul class="entries">
"#,
        id = escape_html(chapter.id.as_str()),
        href = escape_html(chapter.href.as_str()),
        title = escape_html(&chapter.title),
    )
    .unwrap();

    for entry in &chapter.entries {
        let (class, current) = if entry.active {
            ("entry active", r#" aria-current="page""#)
        } else {
            ("entry", "")
        };
        writeln!(
            html,
            r#"<li><a class="{class}" href="{}"{current}>{}</a></li>"#,
            escape_html(entry.path.as_str()),
            escape_html(&entry.title),
        )
        .unwrap();
    }
    html.push_str("</ul>\n</details>\n");
}

/// Render the content pane body.
#[must_use]
pub fn render_pane(pane: &ContentPane) -> String {
    match pane {
        ContentPane::Idle | ContentPane::Loading { .. } => {
            r#"<div class="content-loading" aria-busy="true">Loading…</div>"#.to_owned()
        }
        ContentPane::Ready { page, .. } => {
            let mut html = String::from(r#"<article class="lesson">"#);
            html.push_str(&page.html);
            html.push_str("</article>");
            html.push_str(&render_toc(&page.toc));
            html
        }
        ContentPane::NotFound { route } => format!(
            r#"<div class="content-not-found"><h1>Page not found</h1><p>No lesson exists at <code>{}</code>.</p><p><a href="/">Back to the start</a></p></div>"#,
            escape_html(route.as_str())
        ),
        ContentPane::Failed { route, message } => format!(
            r#"<div class="content-error"><h1>Could not load this page</h1><p><code>{}</code>: {}</p></div>"#,
            escape_html(route.as_str()),
            escape_html(message)
        ),
    }
}

fn render_toc(toc: &[TocEntry]) -> String {
    if toc.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        r#"<nav class="toc" aria-label="On this page"><p class="toc-title">On this page</p><ul>"#,
    );
    for entry in toc {
        write!(
            html,
            r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.title)
        )
        .unwrap();
    }
    html.push_str("</ul></nav>");
    html
}
