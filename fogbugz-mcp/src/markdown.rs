//! HTML to Markdown conversion for wiki article bodies
//!
//! FogBugz stores article bodies as editor HTML. Language models read Markdown
//! far better, so [`html_to_markdown`] walks the parsed DOM and emits
//! CommonMark-style text:
//!
//! - `<h1>`..`<h6>` become ATX headings
//! - `<table>` becomes a pipe table whose first row is the header
//! - `<pre>` becomes a fenced code block
//! - FogBugz code snippet plugins (`<input plugin_type="codesnippet">`) are
//!   appended after the body as fenced blocks, tagged `csharp` or `json`
//!
//! Runs of three or more newlines are collapsed to a single blank line.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("static selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("static selector"));
static SNIPPET_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"input[plugin_type="codesnippet"]"#).expect("static selector")
});

/// Snippets that survived one extra round of escaping in the stored body
static ESCAPED_SNIPPET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sContent=&quot;(.*?)&quot;").expect("static regex"));
static CSHARP_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\b|\bvar\b|client =").expect("static regex"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Convert a FogBugz article body to Markdown
pub fn html_to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut markdown = render_children(fragment.root_element());

    for snippet in extract_code_snippets(html, &fragment) {
        markdown.push_str(&format!(
            "\n\n```{}\n{}\n```",
            snippet_language(&snippet),
            snippet
        ));
    }

    tidy(&markdown)
}

/// Collect code snippet bodies, in document order and without duplicates
fn extract_code_snippets(raw_html: &str, fragment: &Html) -> Vec<String> {
    let escaped = ESCAPED_SNIPPET
        .captures_iter(raw_html)
        .map(|captures| html_escape::decode_html_entities(&captures[1]).into_owned());

    // html5ever lowercases attribute names
    let parsed = fragment
        .select(&SNIPPET_SELECTOR)
        .filter_map(|input| input.value().attr("scontent").map(str::to_string));

    let mut snippets: Vec<String> = Vec::new();
    for snippet in escaped.chain(parsed) {
        let snippet = snippet.replace("\\r\\n", "\n").replace("\r\n", "\n");
        if !snippet.trim().is_empty() && !snippets.contains(&snippet) {
            snippets.push(snippet);
        }
    }
    snippets
}

fn snippet_language(snippet: &str) -> &'static str {
    if CSHARP_HINT.is_match(snippet) {
        "csharp"
    } else {
        "json"
    }
}

fn tidy(markdown: &str) -> String {
    let trimmed_lines = markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINES
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

fn block(content: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else {
        format!("\n\n{content}\n\n")
    }
}

/// Wrap inline content in a marker, keeping surrounding whitespace outside it
fn wrap_inline(content: &str, open: &str, close: &str) -> String {
    let core = content.trim();
    if core.is_empty() {
        return content.to_string();
    }
    let leading = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{open}{core}{close}{trailing}")
}

fn single_line(content: &str) -> String {
    WHITESPACE.replace_all(content.trim(), " ").into_owned()
}

fn render_children(element: ElementRef) -> String {
    let mut out = String::new();
    for child in element.children() {
        let piece = match child.value() {
            Node::Text(text) => WHITESPACE.replace_all(text, " ").into_owned(),
            Node::Element(_) => ElementRef::wrap(child).map(render_element).unwrap_or_default(),
            _ => String::new(),
        };
        if out.is_empty() || out.ends_with('\n') {
            out.push_str(piece.trim_start_matches(' '));
        } else {
            out.push_str(&piece);
        }
    }
    out
}

fn render_element(element: ElementRef) -> String {
    let tag = element.value().name();
    match tag {
        "script" | "style" | "head" | "title" | "noscript" | "input" => String::new(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            let text = single_line(&render_children(element));
            if text.is_empty() {
                String::new()
            } else {
                format!("\n\n{} {}\n\n", "#".repeat(level), text)
            }
        }
        "p" | "section" | "article" | "header" | "footer" | "main" | "figure" => {
            block(&render_children(element))
        }
        "div" => {
            let content = render_children(element);
            let content = content.trim();
            if content.is_empty() {
                String::new()
            } else {
                format!("\n{content}\n")
            }
        }
        "br" => "\n".to_string(),
        "hr" => "\n\n---\n\n".to_string(),
        "strong" | "b" => wrap_inline(&render_children(element), "**", "**"),
        "em" | "i" => wrap_inline(&render_children(element), "*", "*"),
        "s" | "del" | "strike" => wrap_inline(&render_children(element), "~~", "~~"),
        "code" | "kbd" | "tt" => {
            let text: String = element.text().collect();
            wrap_inline(&WHITESPACE.replace_all(&text, " "), "`", "`")
        }
        "pre" => render_pre(element),
        "a" => render_link(element),
        "img" => {
            let alt = element.value().attr("alt").unwrap_or("");
            match element.value().attr("src") {
                Some(src) if !src.is_empty() => format!("![{}]({})", single_line(alt), src),
                _ => String::new(),
            }
        }
        "ul" => render_list(element, false),
        "ol" => render_list(element, true),
        "li" => block(&format!("- {}", render_children(element).trim())),
        "blockquote" => render_blockquote(element),
        "table" => render_table(element),
        _ => render_children(element),
    }
}

fn render_pre(element: ElementRef) -> String {
    let text: String = element.text().collect();
    let language = element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "code")
        .and_then(|code| code.value().attr("class"))
        .and_then(|class| {
            class
                .split_whitespace()
                .find_map(|name| name.strip_prefix("language-"))
        })
        .unwrap_or("");
    let text = text.replace("\r\n", "\n");
    let text = text.trim_matches('\n');
    if text.trim().is_empty() {
        return String::new();
    }
    format!("\n\n```{language}\n{text}\n```\n\n")
}

fn render_link(element: ElementRef) -> String {
    let text = render_children(element);
    let href = element.value().attr("href").unwrap_or("").trim();
    if href.is_empty() || href.starts_with("javascript:") {
        return text;
    }
    let core = single_line(&text);
    if core.is_empty() {
        return String::new();
    }
    if core == href {
        return format!("<{href}>");
    }
    wrap_inline(&text, "[", &format!("]({href})"))
}

fn render_list(element: ElementRef, ordered: bool) -> String {
    let mut number = element
        .value()
        .attr("start")
        .and_then(|start| start.trim().parse::<usize>().ok())
        .unwrap_or(1);

    let mut items = Vec::new();
    for item in element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
    {
        let marker = if ordered {
            format!("{number}.")
        } else {
            "-".to_string()
        };
        number += 1;

        let rendered_item = render_children(item);
        let content = BLANK_LINES
            .replace_all(rendered_item.trim(), "\n")
            .replace("\n\n", "\n");
        let indent = " ".repeat(marker.len() + 1);
        let mut lines = content.lines();
        let first = lines.next().unwrap_or("");
        let mut rendered = format!("{marker} {first}");
        for line in lines {
            rendered.push('\n');
            if !line.is_empty() {
                rendered.push_str(&indent);
                rendered.push_str(line);
            }
        }
        items.push(rendered);
    }

    if items.is_empty() {
        String::new()
    } else {
        format!("\n\n{}\n\n", items.join("\n"))
    }
}

fn render_blockquote(element: ElementRef) -> String {
    let content = tidy(&render_children(element));
    if content.is_empty() {
        return String::new();
    }
    let quoted = content
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\n{quoted}\n\n")
}

fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

fn render_table(table: ElementRef) -> String {
    let mut lines = Vec::new();
    for row in table.select(&ROW_SELECTOR) {
        let cells: Vec<String> = row.select(&CELL_SELECTOR).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }
        lines.push(format!("| {} |", cells.join(" | ")));
        if lines.len() == 1 {
            lines.push(format!("| {} |", vec!["---"; cells.len()].join(" | ")));
        }
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("\n\n{}\n\n", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_use_atx_style() {
        let md = html_to_markdown("<h1>Title</h1><h3>  Sub\n heading </h3><p>Body</p>");
        assert_eq!(md, "# Title\n\n### Sub heading\n\nBody");
    }

    #[test]
    fn test_inline_formatting() {
        let md = html_to_markdown(
            "<p>Run <b>make</b> then <i>wait</i> for <code>cargo  build</code>.</p>",
        );
        assert_eq!(md, "Run **make** then *wait* for `cargo build`.");
    }

    #[test]
    fn test_entities_are_decoded() {
        let md = html_to_markdown("<p>Fish &amp; chips &lt;3</p>");
        assert_eq!(md, "Fish & chips <3");
    }

    #[test]
    fn test_links_and_images() {
        let md = html_to_markdown(
            r#"<p>See <a href="https://example.com/docs">the docs</a> or <a href="https://x.io">https://x.io</a></p><img src="/img/a.png" alt="diagram">"#,
        );
        assert_eq!(
            md,
            "See [the docs](https://example.com/docs) or <https://x.io>\n\n![diagram](/img/a.png)"
        );
    }

    #[test]
    fn test_unordered_and_nested_lists() {
        let md = html_to_markdown(
            "<ul><li>One</li><li>Two<ul><li>Two A</li><li>Two B</li></ul></li><li>Three</li></ul>",
        );
        assert_eq!(md, "- One\n- Two\n  - Two A\n  - Two B\n- Three");
    }

    #[test]
    fn test_ordered_list_with_start() {
        let md = html_to_markdown(r#"<ol start="3"><li>Third</li><li>Fourth</li></ol>"#);
        assert_eq!(md, "3. Third\n4. Fourth");
    }

    #[test]
    fn test_table_becomes_pipe_table() {
        let md = html_to_markdown(
            "<table><tr><th>Name</th><th>Port</th></tr><tr><td> api </td><td>8080</td></tr><tr><td>db</td><td>5432</td></tr></table>",
        );
        assert_eq!(
            md,
            "| Name | Port |\n| --- | --- |\n| api | 8080 |\n| db | 5432 |"
        );
    }

    #[test]
    fn test_table_cells_escape_pipes() {
        let md = html_to_markdown("<table><tr><td>a|b</td></tr></table>");
        assert_eq!(md, "| a\\|b |\n| --- |");
    }

    #[test]
    fn test_pre_becomes_fenced_block() {
        let md = html_to_markdown(
            "<p>Example:</p><pre><code class=\"language-rust\">fn main() {\n    println!(\"hi\");\n}\n</code></pre>",
        );
        assert_eq!(
            md,
            "Example:\n\n```rust\nfn main() {\n    println!(\"hi\");\n}\n```"
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        let md = html_to_markdown("<blockquote><p>Quoted</p><p>Twice</p></blockquote><hr><p>After</p>");
        assert_eq!(md, "> Quoted\n>\n> Twice\n\n---\n\nAfter");
    }

    #[test]
    fn test_scripts_are_dropped() {
        let md = html_to_markdown("<p>Visible</p><script>alert(1)</script><style>p{}</style>");
        assert_eq!(md, "Visible");
    }

    #[test]
    fn test_blank_lines_collapse() {
        let md = html_to_markdown("<p>A</p><p></p><div></div><br><br><br><p>B</p>");
        assert_eq!(md, "A\n\nB");
    }

    #[test]
    fn test_escaped_code_snippet_is_appended_as_csharp() {
        let html = r#"<p>Client setup</p><input plugin_type="codesnippet" data="sContent=&quot;var client = new Client();\r\nclient.Run();&quot;">"#;
        let md = html_to_markdown(html);
        assert_eq!(
            md,
            "Client setup\n\n```csharp\nvar client = new Client();\nclient.Run();\n```"
        );
    }

    #[test]
    fn test_attribute_code_snippet_is_appended_as_json() {
        let html = r#"<p>Payload</p><input plugin_type="codesnippet" sContent="{&quot;id&quot;: 1}">"#;
        let md = html_to_markdown(html);
        assert_eq!(md, "Payload\n\n```json\n{\"id\": 1}\n```");
    }

    #[test]
    fn test_snippet_language_detection() {
        assert_eq!(snippet_language("public class Foo {}"), "csharp");
        assert_eq!(snippet_language("var x = 1;"), "csharp");
        assert_eq!(snippet_language("client = Connect()"), "csharp");
        assert_eq!(snippet_language("{\"classification\": 1}"), "json");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(html_to_markdown(""), "");
        assert_eq!(html_to_markdown("   "), "");
    }
}
