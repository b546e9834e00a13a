use std::collections::BTreeMap;

use crate::directory::MissingPodcast;
use crate::models::{Episode, Podcast};

// ---------------------------------------------------------------------------
// HTML escaping
// ---------------------------------------------------------------------------

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn html_attr_escape(s: &str) -> String {
    html_escape(s).replace('"', "&quot;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>{title} - Podcast Directory</title>
</head>
<body>
<nav><a href="/toplist">Toplist</a> | <a href="/missing">Missing Podcast</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = html_escape(title),
        body = body,
    )
}

// ---------------------------------------------------------------------------
// Toplist
// ---------------------------------------------------------------------------

pub fn toplist_page(
    languages: &BTreeMap<String, String>,
    selected: Option<&str>,
    podcasts: &[Podcast],
) -> String {
    let mut body = String::new();

    body.push_str(r#"<ul class="languages">"#);
    body.push_str(r#"<li><a href="/toplist">All languages</a></li>"#);
    for (code, name) in languages {
        let class = if selected == Some(code.as_str()) {
            r#" class="active""#
        } else {
            ""
        };
        body.push_str(&format!(
            r#"<li{class}><a href="/toplist?lang={code}">{name}</a></li>"#,
            code = urlencoding::encode(code),
            name = html_escape(name),
        ));
    }
    body.push_str("</ul>\n");

    if podcasts.is_empty() {
        body.push_str("<p>No podcasts found.</p>");
    } else {
        body.push_str(r#"<ol class="toplist">"#);
        for podcast in podcasts {
            let website = match podcast.link.as_deref().filter(|_| podcast.has_link()) {
                Some(link) => format!(r#" (<a href="{}">website</a>)"#, html_attr_escape(link)),
                None => String::new(),
            };
            body.push_str(&format!(
                r#"<li><a href="/podcast/{id}">{title}</a>{website} <span class="subscribers">{count} subscribers</span></li>"#,
                id = urlencoding::encode(&podcast.id),
                title = html_escape(podcast.display_title()),
                count = podcast.subscribers,
            ));
        }
        body.push_str("</ol>");
    }

    page("Toplist", &body)
}

// ---------------------------------------------------------------------------
// Podcast details
// ---------------------------------------------------------------------------

pub fn podcast_page(podcast: &Podcast, episodes: &[Episode]) -> String {
    let mut body = String::new();

    if let Some(description) = &podcast.description {
        body.push_str(&format!("<p>{}</p>", html_escape(description)));
    }
    if let Some(link) = podcast.link.as_deref().filter(|_| podcast.has_link()) {
        body.push_str(&format!(
            r#"<p><a href="{}">{}</a></p>"#,
            html_attr_escape(link),
            html_escape(link)
        ));
    }
    if let Some(language) = &podcast.language {
        body.push_str(&format!(
            r#"<p class="language">{}</p>"#,
            html_escape(language)
        ));
    }
    body.push_str(&format!(
        r#"<p class="subscribers">{} subscribers</p>"#,
        podcast.subscribers
    ));

    if episodes.is_empty() {
        body.push_str("<p>No episodes yet.</p>");
    } else {
        body.push_str(r#"<ul class="episodes">"#);
        for episode in episodes {
            let released = episode
                .released
                .map(|dt| format!(" <time>{}</time>", dt.format("%Y-%m-%d")))
                .unwrap_or_default();
            let title = html_escape(&episode.title);
            let entry = match &episode.url {
                Some(url) => format!(r#"<a href="{}">{}</a>"#, html_attr_escape(url), title),
                None => title,
            };
            body.push_str(&format!("<li>{entry}{released}</li>"));
        }
        body.push_str("</ul>");
    }

    page(podcast.display_title(), &body)
}

// ---------------------------------------------------------------------------
// Missing podcast
// ---------------------------------------------------------------------------

pub fn missing_page(result: &MissingPodcast) -> String {
    let mut body = String::new();

    if let Some(error) = &result.error {
        body.push_str(&format!(
            r#"<div class="alert alert-error">{}</div>"#,
            html_escape(error)
        ));
    }

    body.push_str(&format!(
        r#"<form action="/missing" method="get"><input type="url" name="q" value="{}" /><button type="submit">Check</button></form>"#,
        html_attr_escape(result.url.as_deref().unwrap_or_default())
    ));

    match (&result.url, &result.podcast) {
        (None, _) => {
            body.push_str("<p>Enter the feed URL of the podcast you are looking for.</p>");
        }
        (Some(_), Some(podcast)) if !result.can_add && podcast.has_link() => {
            body.push_str(&format!(
                "<p>{} is already in the directory.</p>",
                html_escape(podcast.display_title())
            ));
        }
        (Some(url), _) if result.can_add => {
            body.push_str(&format!(
                r#"<p>{} is not in the directory yet.</p><a class="btn" href="/subscribe?url={}">Add Podcast</a>"#,
                html_escape(url),
                urlencoding::encode(url)
            ));
        }
        (Some(url), _) => {
            body.push_str(&format!(
                "<p>{} cannot be added to the directory.</p>",
                html_escape(url)
            ));
        }
    }

    page("Missing Podcast", &body)
}
