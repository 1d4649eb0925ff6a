//! Markdown rendering with heading anchors, media embeds, math
//! typesetting, and syntax highlighting

use lazy_static::lazy_static;
use latex2mathml::{latex_to_mathml, DisplayStyle};
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::HashMap;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::helpers::lang::language_token;

lazy_static! {
    // Open tags only; attribute order (src before alt) follows how the
    // markdown generator and content authors write them
    static ref VIDEO_TAG: Regex =
        Regex::new(r#"<video[^>]*\bsrc="([^"]*)"[^>]*>"#).unwrap();
    static ref IMG_TAG: Regex =
        Regex::new(r#"<img[^>]*\bsrc="([^"]*)"[^>]*\balt="([^"]*)"[^>]*>"#).unwrap();
}

/// Copy-to-clipboard control injected next to every code block. Markup
/// only - the page attaches the click behavior.
const COPY_BUTTON: &str = concat!(
    r#"<button class="copy-button" type="button" aria-label="Copy code">"#,
    r#"<span class="copy-icon"><svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><rect width="14" height="14" x="8" y="8" rx="2" ry="2"/><path d="M4 16c-1.1 0-2-.9-2-2V4c0-1.1.9-2 2-2h10c1.1 0 2 .9 2 2"/></svg></span>"#,
    r#"<span class="check-icon hidden"><svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="20 6 9 17 4 12"/></svg></span>"#,
    r#"</button>"#,
);

/// Markdown renderer
///
/// Pure and deterministic: no I/O, and identical input always yields
/// identical output for a fixed syntax set.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    auto_detect: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(true)
    }

    /// Create with custom settings
    pub fn with_options(auto_detect: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            auto_detect,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_MATH
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (fence token, accumulated source) while inside a code block
        let mut code_block: Option<(Option<String>, String)> = None;
        // (src, accumulated alt text) while inside an image
        let mut image: Option<(String, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let token = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block = Some((token, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((token, source)) = code_block.take() {
                        let block = self.highlight_block(&source, token.as_deref());
                        events.push(Event::Html(CowStr::from(block)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, source)) = code_block.as_mut() {
                        source.push_str(&text);
                    }
                }
                Event::Start(Tag::Image { dest_url, .. }) => {
                    image = Some((dest_url.to_string(), String::new()));
                }
                Event::End(TagEnd::Image) => {
                    if let Some((src, alt)) = image.take() {
                        events.push(Event::Html(CowStr::from(image_embed(&src, &alt))));
                    }
                }
                Event::Text(text) if image.is_some() => {
                    if let Some((_, alt)) = image.as_mut() {
                        alt.push_str(&text);
                    }
                }
                Event::InlineMath(tex) => {
                    events.push(Event::InlineHtml(CowStr::from(render_math(&tex, false))));
                }
                Event::DisplayMath(tex) => {
                    events.push(Event::Html(CowStr::from(render_math(&tex, true))));
                }
                Event::Html(fragment) => {
                    events.push(Event::Html(CowStr::from(rewrite_embeds(&fragment))));
                }
                Event::InlineHtml(fragment) => {
                    events.push(Event::InlineHtml(CowStr::from(rewrite_embeds(&fragment))));
                }
                other => events.push(other),
            }
        }

        anchor_headings(&mut events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block and wrap it with the copy control
    fn highlight_block(&self, source: &str, fence_token: Option<&str>) -> String {
        let body = match self.try_highlight(source, fence_token) {
            Ok(highlighted) => highlighted,
            Err(e) => {
                tracing::warn!("Code highlighting failed, falling back to plain text: {}", e);
                html_escape(source)
            }
        };

        let class = match fence_token {
            Some(token) => format!("code language-{}", html_escape(token)),
            None => "code".to_string(),
        };

        format!(
            r#"<div class="code-wrapper"><pre><code class="{}">{}</code></pre>{}</div>"#,
            class, body, COPY_BUTTON
        )
    }

    fn try_highlight(&self, source: &str, fence_token: Option<&str>) -> Result<String, syntect::Error> {
        let syntax = match fence_token.map(language_token) {
            Some(token) => self
                .syntax_set
                .find_syntax_by_token(token)
                .or_else(|| self.syntax_set.find_syntax_by_extension(token)),
            None if self.auto_detect => self.syntax_set.find_syntax_by_first_line(source),
            None => None,
        }
        .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::Spaced,
        );
        for line in LinesWithEndings::from(source) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Inject an `id` into every heading start event, slugified from the
/// heading's text content. Explicit `{#id}` attributes win; repeated
/// slugs get `-1`, `-2`, ... suffixes.
fn anchor_headings(events: &mut [Event]) {
    let mut used: HashMap<String, usize> = HashMap::new();

    let mut i = 0;
    while i < events.len() {
        if matches!(events[i], Event::Start(Tag::Heading { .. })) {
            let mut text = String::new();
            let mut j = i + 1;
            while j < events.len() {
                match &events[j] {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(t) => text.push_str(t),
                    Event::Code(t) => text.push_str(t),
                    _ => {}
                }
                j += 1;
            }

            if let Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) = std::mem::replace(&mut events[i], Event::Rule)
            {
                let anchor = match id {
                    Some(explicit) => explicit.to_string(),
                    None => {
                        let slugged = slug::slugify(&text);
                        if slugged.is_empty() {
                            "section".to_string()
                        } else {
                            slugged
                        }
                    }
                };
                let anchor = disambiguate(&mut used, anchor);
                events[i] = Event::Start(Tag::Heading {
                    level,
                    id: Some(CowStr::from(anchor)),
                    classes,
                    attrs,
                });
            }
            i = j;
        }
        i += 1;
    }
}

fn disambiguate(used: &mut HashMap<String, usize>, anchor: String) -> String {
    let seen = used.entry(anchor.clone()).or_insert(0);
    *seen += 1;
    if *seen == 1 {
        anchor
    } else {
        format!("{}-{}", anchor, *seen - 1)
    }
}

/// Rewrite `<video>` and `<img>` tags inside a raw HTML fragment into
/// hydration wrappers. Fragments without either tag pass through as-is.
fn rewrite_embeds(fragment: &str) -> String {
    if !fragment.contains("<video") && !fragment.contains("<img") {
        return fragment.to_string();
    }

    let mut out = fragment.to_string();
    if VIDEO_TAG.is_match(&out) {
        out = VIDEO_TAG
            .replace_all(&out, |caps: &regex::Captures| video_embed(&caps[1]))
            .replace("</video>", "");
    }
    if IMG_TAG.is_match(&out) {
        out = IMG_TAG
            .replace_all(&out, |caps: &regex::Captures| image_embed(&caps[1], &caps[2]))
            .into_owned();
    }
    out
}

fn video_embed(src: &str) -> String {
    format!(
        r#"<div class="custom-video-player"><div data-video-src="{}"></div></div>"#,
        html_escape(src)
    )
}

fn image_embed(src: &str, alt: &str) -> String {
    format!(
        r#"<div class="custom-image-viewer"><div data-image-src="{}" data-image-alt="{}"></div></div>"#,
        html_escape(src),
        html_escape(alt)
    )
}

/// Typeset a TeX formula to MathML; a formula that fails to translate
/// degrades to its escaped source
fn render_math(tex: &str, display: bool) -> String {
    let style = if display {
        DisplayStyle::Block
    } else {
        DisplayStyle::Inline
    };
    match latex_to_mathml(tex, style) {
        Ok(mathml) => mathml,
        Err(e) => {
            tracing::warn!("Math rendering failed: {}", e);
            let class = if display {
                "math math-display math-error"
            } else {
                "math math-inline math-error"
            };
            format!(r#"<span class="{}">{}</span>"#, class, html_escape(tex))
        }
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
