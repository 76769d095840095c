use lazy_static::lazy_static;
use pulldown_cmark::{html, Event, Options, Parser, Tag};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a").expect("valid selector for anchors");
    static ref HEADING: Selector = Selector::parse("h1").expect("valid selector for h1");
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector for paragraphs");
}

/// One parsed wiki page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Base name of the source file, path stripped
    pub file_name: String,
    pub raw: String,
    pub html: String,
    /// Outbound link targets in document order, duplicates kept
    pub links: Vec<String>,
    /// Anchor texts joined with newlines
    pub link_text: String,
    /// Text of the first level-1 heading
    pub title: Option<String>,
    /// Paragraph texts joined with newlines
    pub paragraphs: String,
}

impl Document {
    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }
}

/// Render markdown to HTML and collect link destinations as written.
///
/// The HTML writer percent-encodes hrefs, so targets are taken from the
/// event stream instead of the rendered anchors.
pub fn render_markdown(raw: &str) -> (String, Vec<String>) {
    let events: Vec<Event<'_>> = Parser::new_ext(raw, Options::empty()).collect();
    let links = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
            _ => None,
        })
        .collect();

    let mut out = String::with_capacity(raw.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    (out, links)
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Parse one markdown file into a [`Document`].
///
/// ```
/// use wikidex::parser::parse_document;
///
/// let doc = parse_document("home.md", "# Home\n\nSee [the garden](garden.md).\n");
/// assert_eq!(doc.title.as_deref(), Some("Home"));
/// assert_eq!(doc.links, vec!["garden.md".to_string()]);
/// assert_eq!(doc.paragraphs, "See the garden.");
/// ```
pub fn parse_document(file_name: &str, raw: &str) -> Document {
    let (html, links) = render_markdown(raw);
    let fragment = Html::parse_fragment(&html);

    let link_text = fragment
        .select(&ANCHOR)
        .map(|a| element_text(&a))
        .collect::<Vec<_>>()
        .join("\n");

    let title = fragment.select(&HEADING).next().map(|h| element_text(&h));

    let paragraphs = fragment
        .select(&PARAGRAPH)
        .map(|p| element_text(&p))
        .collect::<Vec<_>>()
        .join("\n");

    Document {
        file_name: file_name.to_string(),
        raw: raw.to_string(),
        html,
        links,
        link_text,
        title,
        paragraphs,
    }
}
