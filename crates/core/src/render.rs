//! Standalone HTML documents for the public view of a published site.

use crate::codec::component::{escape_attr, escape_text};
use crate::document::PublishedSite;

/// Render page `index` of a site. Out-of-range indexes render the first page.
pub fn render_site_page(site: &PublishedSite, index: usize) -> String {
    let Some(page) = site.pages.get(index).or_else(|| site.pages.first()) else {
        return render_notice(
            &site.site_label,
            "Site has no content",
            "This site doesn't have any published pages yet.",
        );
    };
    let index = if index < site.pages.len() { index } else { 0 };

    let title = if site.site_label.is_empty() {
        page.name.clone()
    } else {
        format!("{} · {}", page.name, site.site_label)
    };

    let body = if page.html.trim().is_empty() {
        format!(
            "<div class=\"empty-page\"><h2>No Content Available</h2>\
             <p>The page \"{}\" doesn't have any content to display.</p></div>",
            escape_text(&page.name)
        )
    } else {
        page.html.clone()
    };

    let mut out = String::with_capacity(page.html.len() + page.css.len() + 512);
    out.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    out.push_str(&format!("<title>{}</title>", escape_text(&title)));
    out.push_str(&format!(
        "<style id=\"page-styles\">{}</style>",
        page.css.replace("</style", "<\\/style")
    ));
    out.push_str("</head><body>");

    if site.pages.len() > 1 {
        out.push_str(&navigation(site, index));
    }
    out.push_str(&body);
    out.push_str("</body></html>");
    out
}

fn navigation(site: &PublishedSite, current: usize) -> String {
    let links: String = site
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let class = if i == current { " class=\"active\"" } else { "" };
            format!(
                "<a href=\"?page={i}\"{class} data-page-id=\"{}\">{}</a>",
                escape_attr(&page.id),
                escape_text(&page.name)
            )
        })
        .collect();

    let label = if site.site_label.is_empty() {
        "Published Site"
    } else {
        site.site_label.as_str()
    };
    format!(
        "<nav class=\"site-nav\"><span class=\"site-name\">{}</span>{links}</nav>",
        escape_text(label)
    )
}

/// Render a minimal informational document, e.g. for a missing site.
pub fn render_notice(site_label: &str, heading: &str, message: &str) -> String {
    let title = if site_label.is_empty() { heading } else { site_label };
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body><main class=\"notice\"><h1>{}</h1><p>{}</p><a href=\"/\">Return Home</a></main></body></html>",
        escape_text(title),
        escape_text(heading),
        escape_text(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PublishedPage;
    use chrono::Utc;

    fn site(pages: Vec<PublishedPage>) -> PublishedSite {
        PublishedSite {
            public_id: "abc".into(),
            owner_id: "u1".into(),
            owner_contact: String::new(),
            site_label: "Bakery".into(),
            pages,
            published_at: Utc::now(),
            updated_at: Utc::now(),
            is_published: true,
        }
    }

    fn page(id: &str, name: &str, html: &str, css: &str) -> PublishedPage {
        PublishedPage {
            name: name.into(),
            html: html.into(),
            css: css.into(),
            id: id.into(),
        }
    }

    #[test]
    fn single_page_has_no_navigation() {
        let html = render_site_page(&site(vec![page("p1", "Home", "<div>Hi</div>", "div{color:red}")]), 0);
        assert!(html.contains("<style id=\"page-styles\">div{color:red}</style>"));
        assert!(html.contains("<body><div>Hi</div></body>"));
        assert!(!html.contains("site-nav"));
    }

    #[test]
    fn multi_page_sites_get_navigation_and_selection() {
        let s = site(vec![
            page("p1", "Home", "<p>home</p>", ""),
            page("p2", "About & Us", "<p>about</p>", ""),
        ]);
        let html = render_site_page(&s, 1);
        assert!(html.contains("<a href=\"?page=1\" class=\"active\" data-page-id=\"p2\">About &amp; Us</a>"));
        assert!(html.contains("<p>about</p>"));

        let fallback = render_site_page(&s, 7);
        assert!(fallback.contains("<p>home</p>"));
        assert!(fallback.contains("<a href=\"?page=0\" class=\"active\""));
    }

    #[test]
    fn blank_pages_and_empty_sites() {
        let html = render_site_page(&site(vec![page("p1", "Home", "  ", "")]), 0);
        assert!(html.contains("No Content Available"));

        let html = render_site_page(&site(Vec::new()), 0);
        assert!(html.contains("Site has no content"));
    }
}
