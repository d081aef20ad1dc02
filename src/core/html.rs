// src/core/html.rs
// DOM helpers on top of `scraper`. They read text the way the site renders it:
// entities decoded, whitespace collapsed, one line per block element.

use scraper::{ElementRef, Node, Selector};

use super::sanitize::normalize_ws;

/// Tags that start a new visual line when flattening an element to text.
const BREAK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "tr", "dt", "dd", "dl", "ul", "ol", "table", "tbody",
    "thead", "section", "article", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
];

/// Compile a selector literal. Only used on constants in this crate.
pub fn sel(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector literal must parse")
}

/// Visible text of an element, whitespace-collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    let joined = el.text().collect::<Vec<_>>().join(" ");
    normalize_ws(&joined)
}

/// Flatten an element into visual lines (split at block elements and `<br>`).
/// Empty lines are dropped.
pub fn text_lines(el: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = s!();
    walk_lines(el, &mut buf, &mut out);
    flush_line(&mut buf, &mut out);
    out
}

fn walk_lines(el: ElementRef<'_>, buf: &mut String, out: &mut Vec<String>) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => {
                buf.push(' ');
                buf.push_str(t);
            }
            Node::Element(e) => {
                let name = e.name();
                if name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style") {
                    continue;
                }
                let breaks = BREAK_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t));
                if breaks { flush_line(buf, out); }
                if let Some(child_el) = ElementRef::wrap(child) {
                    walk_lines(child_el, buf, out);
                }
                if breaks { flush_line(buf, out); }
            }
            _ => {}
        }
    }
}

fn flush_line(buf: &mut String, out: &mut Vec<String>) {
    let line = normalize_ws(buf);
    if !line.is_empty() { out.push(line); }
    buf.clear();
}

/// Direct element children with one of the given tag names, in order.
pub fn child_elements<'a>(el: ElementRef<'a>, names: &[&str]) -> Vec<ElementRef<'a>> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| names.iter().any(|n| c.value().name().eq_ignore_ascii_case(n)))
        .collect()
}

pub fn tag_is(el: ElementRef<'_>, name: &str) -> bool {
    el.value().name().eq_ignore_ascii_case(name)
}

/// Does the element's id, or any of its classes, equal one of `names`
/// (ASCII case-insensitive)?
pub fn id_or_class_in(el: ElementRef<'_>, names: &[&str]) -> bool {
    let v = el.value();
    let hit = |s: &str| names.iter().any(|n| s.eq_ignore_ascii_case(n));
    v.id().is_some_and(|i| hit(i)) || v.classes().any(|c| hit(c))
}

/// All `href`s under (and including) the element, in document order.
pub fn hrefs(el: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(h) = el.value().attr("href") { out.push(h.trim().to_string()); }
    for child in el.descendants().filter_map(ElementRef::wrap) {
        if child.id() == el.id() { continue; }
        if let Some(h) = child.value().attr("href") {
            out.push(h.trim().to_string());
        }
    }
    out
}

/// Is `el` strictly inside `outer`?
pub fn is_inside(el: ElementRef<'_>, outer: ElementRef<'_>) -> bool {
    el.ancestors().any(|a| a.id() == outer.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(doc: &'a Html, css: &'static str) -> ElementRef<'a> {
        doc.select(&sel(css)).next().unwrap()
    }

    #[test]
    fn lines_split_on_blocks_and_br() {
        let doc = Html::parse_fragment(
            "<div id=x><b>Owner:</b> Acme&nbsp;Health<br>Owner Since: 2020-01-15<p>Beds <i>12</i></p></div>",
        );
        let lines = text_lines(first(&doc, "#x"));
        assert_eq!(lines, vec!["Owner: Acme Health", "Owner Since: 2020-01-15", "Beds 12"]);
    }

    #[test]
    fn scripts_are_not_text() {
        let doc = Html::parse_fragment("<div id=x>Name: A<script>var x = 'Name: B';</script></div>");
        assert_eq!(text_lines(first(&doc, "#x")), vec!["Name: A"]);
    }

    #[test]
    fn id_or_class_match_is_case_insensitive() {
        let doc = Html::parse_fragment(r#"<div class="wrap SearchResults"></div>"#);
        assert!(id_or_class_in(first(&doc, "div"), &["searchresults"]));
        assert!(!id_or_class_in(first(&doc, "div"), &["results"]));
    }

    #[test]
    fn hrefs_in_order() {
        let doc = Html::parse_fragment(r#"<p><a href="/a?LID=1">x</a> <a href=" http://b.org ">y</a></p>"#);
        assert_eq!(hrefs(first(&doc, "p")), vec!["/a?LID=1", "http://b.org"]);
    }
}
