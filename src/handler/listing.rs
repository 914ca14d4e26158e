//! Listing renderer module
//!
//! Turns a prefix listing of the object store into the HTML course browser
//! page: course overview with per-course lecture counts at the root, and a
//! chapter-grouped lecture list inside a course.

use std::io;

use hyper::Response;

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::storage::ObjectEntry;

/// Display class of a rendered link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    Course,
    Chapter,
    Lecture,
}

impl LinkClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Chapter => "chapter",
            Self::Lecture => "lecture",
        }
    }
}

/// One clickable (or, for chapter headers, inert) line of the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Object key to navigate to, or `#` for non-navigable chapter headers
    pub path: String,
    pub text: String,
    pub class: LinkClass,
}

/// Parse a key into its `(course, chapter, lecture title)` segments.
///
/// Fewer than three segments pad with empty strings, so the parse never
/// fails on truncated keys. With three or more, the tail segments are
/// rejoined with `/` to form the title.
// TODO: the `.html` removal below deletes the first occurrence anywhere in
// the title, not just a trailing suffix ("ch1/intro.html.bak" becomes
// "intro.bak"); decide whether suffix-anchored trimming is wanted before
// changing it.
pub fn key_parts(key: &str) -> [String; 3] {
    let segments: Vec<&str> = key.split('/').collect();

    if segments.len() < 3 {
        let mut parts = [String::new(), String::new(), String::new()];
        for (slot, segment) in parts.iter_mut().zip(&segments) {
            *slot = (*segment).to_string();
        }
        return parts;
    }

    let title = segments[2..].join("/").replacen(".html", "", 1);
    [segments[0].to_string(), segments[1].to_string(), title]
}

/// Root mode: one link per distinct course, counting its entries.
///
/// Courses appear in first-seen listing order; entries whose key yields an
/// empty course segment are skipped.
pub fn course_overview(entries: &[ObjectEntry]) -> Vec<Link> {
    // Association list keeps first-insertion order, which is the output order
    let mut counts: Vec<(String, usize)> = Vec::new();

    for entry in entries {
        let [course, _, _] = key_parts(&entry.key);
        if course.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(name, _)| *name == course) {
            Some((_, count)) => *count += 1,
            None => counts.push((course, 1)),
        }
    }

    counts
        .into_iter()
        .map(|(course, count)| Link {
            text: format!("{course} ({count})"),
            path: course,
            class: LinkClass::Course,
        })
        .collect()
}

/// Course mode: lecture links in listing order, with a chapter header
/// emitted whenever the chapter segment changes.
pub fn chapter_listing(entries: &[ObjectEntry]) -> Vec<Link> {
    let mut links = Vec::new();
    let mut chapter = String::new();

    for entry in entries {
        let [_, current_chapter, title] = key_parts(&entry.key);
        if current_chapter != chapter {
            chapter = current_chapter;
            links.push(Link {
                path: "#".to_string(),
                text: chapter.clone(),
                class: LinkClass::Chapter,
            });
        }
        links.push(Link {
            path: entry.key.clone(),
            text: title,
            class: LinkClass::Lecture,
        });
    }

    links
}

/// Render the collected links into the listing page
pub fn render_page(links: &[Link]) -> String {
    let content: String = links
        .iter()
        .map(|link| {
            format!(
                "        <div class=\"link\">\n            <a class=\"{}\" href=\"/{}\">{}</a>\n        </div>\n",
                link.class.as_str(),
                link.path,
                link.text
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <title>Document</title>
        <style>
            .link {{ margin-bottom: 10px; }}
            .link a {{ text-decoration: none; color: #333; }}
            .course {{ font-size: 18px; }}
            .chapter {{ font-size: 18px; pointer-events: none; }}
            .lecture {{ padding-left: 50px; font-size: 16px; }}
            .lecture:visited {{ color: #aaa3a3; }}
            .link a:hover {{ color: #7a77e0; }}
        </style>
    </head>
    <body>
{content}    </body>
</html>
"#
    )
}

/// Serve the listing for a prefix key: empty prefix renders the course
/// overview, anything else the chapter-grouped course page.
pub async fn serve_listing(prefix: &str, state: &AppState) -> io::Result<Response<ResponseBody>> {
    let entries = state.store.list(prefix, true).await?;

    let links = if prefix.is_empty() {
        course_overview(&entries)
    } else {
        chapter_listing(&entries)
    };

    Ok(http::build_html_response(render_page(&links)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::storage::HttpMetadata;

    fn entry(key: &str) -> ObjectEntry {
        ObjectEntry {
            key: key.to_string(),
            custom_metadata: HashMap::new(),
            http_metadata: HttpMetadata::for_key(key),
        }
    }

    #[test]
    fn test_key_parts_padding() {
        assert_eq!(key_parts(""), ["", "", ""]);
        assert_eq!(key_parts("math"), ["math", "", ""]);
        assert_eq!(key_parts("math/ch1"), ["math", "ch1", ""]);
    }

    #[test]
    fn test_key_parts_title_join_and_html_strip() {
        assert_eq!(key_parts("math/ch1/lec1.html"), ["math", "ch1", "lec1"]);
        assert_eq!(
            key_parts("math/ch1/sub/lec1.html"),
            ["math", "ch1", "sub/lec1"]
        );
    }

    #[test]
    fn test_key_parts_strips_first_html_occurrence_anywhere() {
        // Deliberate behavior of the blunt removal, see the TODO above
        assert_eq!(
            key_parts("math/ch1/intro.html.bak"),
            ["math", "ch1", "intro.bak"]
        );
        assert_eq!(
            key_parts("math/ch1/a.html/b.html"),
            ["math", "ch1", "a/b.html"]
        );
    }

    #[test]
    fn test_course_overview_counts_in_first_seen_order() {
        let entries = [
            entry("a/1/x.html"),
            entry("a/1/y.html"),
            entry("b/1/z.html"),
        ];
        let links = course_overview(&entries);
        assert_eq!(
            links,
            [
                Link {
                    path: "a".to_string(),
                    text: "a (2)".to_string(),
                    class: LinkClass::Course,
                },
                Link {
                    path: "b".to_string(),
                    text: "b (1)".to_string(),
                    class: LinkClass::Course,
                },
            ]
        );
    }

    #[test]
    fn test_course_overview_skips_empty_course() {
        let entries = [entry(""), entry("a/1/x.html")];
        let links = course_overview(&entries);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path, "a");
    }

    #[test]
    fn test_chapter_listing_interleaves_headers() {
        let entries = [
            entry("a/ch1/x.html"),
            entry("a/ch1/y.html"),
            entry("a/ch2/z.html"),
        ];
        let links = chapter_listing(&entries);

        let expected = [
            ("#", "ch1", LinkClass::Chapter),
            ("a/ch1/x.html", "x", LinkClass::Lecture),
            ("a/ch1/y.html", "y", LinkClass::Lecture),
            ("#", "ch2", LinkClass::Chapter),
            ("a/ch2/z.html", "z", LinkClass::Lecture),
        ];
        assert_eq!(links.len(), expected.len());
        for (link, (path, text, class)) in links.iter().zip(expected) {
            assert_eq!(link.path, path);
            assert_eq!(link.text, text);
            assert_eq!(link.class, class);
        }
    }

    #[test]
    fn test_render_page_markup() {
        let links = [Link {
            path: "math".to_string(),
            text: "math (3)".to_string(),
            class: LinkClass::Course,
        }];
        let html = render_page(&links);
        assert!(html.contains("<a class=\"course\" href=\"/math\">math (3)</a>"));
        assert!(html.contains(".lecture { padding-left: 50px; font-size: 16px; }"));
        assert!(html.contains(".link a:hover { color: #7a77e0; }"));
    }

    #[test]
    fn test_render_page_empty() {
        let html = render_page(&[]);
        assert!(html.contains("<body>"));
        assert!(!html.contains("class=\"link\""));
    }
}
