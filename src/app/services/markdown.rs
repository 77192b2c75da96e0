//! Markdown to preview HTML, honouring the surface's `EditorConfig`.
//!
//! Disabled capabilities are not rejected: their markup degrades to plain
//! text (a disabled heading renders as a paragraph, a disabled image as its
//! alt text). Fenced code blocks in a registered language are coloured with
//! syntect using `<font>` tags, which is what FLTK's HelpView understands.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::app::domain::editor_config::EditorConfig;

const CODE_THEME: &str = "InspiredGitHub";

/// Rendered HTML plus any non-fatal problems hit along the way.
#[derive(Debug, Default)]
pub struct RenderOutput {
    pub html: String,
    pub errors: Vec<String>,
}

/// How an opening tag is carried into the output; its closing tag follows suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Treatment {
    Keep,
    Drop,
    AsParagraph,
    Code,
}

struct PendingCode {
    /// Fence info string; `None` for indented blocks.
    info: Option<String>,
    text: String,
}

pub struct MarkdownRenderer {
    config: EditorConfig,
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl MarkdownRenderer {
    pub fn new(config: EditorConfig) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme = ThemeSet::load_defaults()
            .themes
            .remove(CODE_THEME)
            .unwrap_or_default();
        Self {
            config,
            syntax_set,
            theme,
        }
    }

    fn options(&self) -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        if self.config.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        options
    }

    fn treatment(&self, tag: &Tag) -> Treatment {
        let c = &self.config;
        match tag {
            Tag::Heading { .. } if !c.headings => Treatment::AsParagraph,
            Tag::List(_) if !c.lists => Treatment::Drop,
            Tag::Item if !c.lists => Treatment::AsParagraph,
            Tag::BlockQuote(_) if !c.quotes => Treatment::Drop,
            Tag::Link { .. } if !c.links => Treatment::Drop,
            Tag::Image { .. } if !c.images => Treatment::Drop,
            Tag::CodeBlock(_) if c.code_blocks.is_none() => Treatment::AsParagraph,
            Tag::CodeBlock(_) => Treatment::Code,
            _ => Treatment::Keep,
        }
    }

    pub fn render(&self, text: &str) -> RenderOutput {
        let mut out = RenderOutput::default();
        let mut events: Vec<Event> = Vec::new();
        let mut stack: Vec<Treatment> = Vec::new();
        let mut code: Option<PendingCode> = None;

        for event in Parser::new_ext(text, self.options()) {
            if let Some(mut block) = code.take() {
                match event {
                    Event::End(_) => {
                        stack.pop();
                        let rendered = self.render_code_block(&block, &mut out.errors);
                        events.push(Event::Html(rendered.into()));
                    }
                    Event::Text(t) => {
                        block.text.push_str(&t);
                        code = Some(block);
                    }
                    _ => code = Some(block),
                }
                continue;
            }

            match event {
                Event::Start(tag) => {
                    let treatment = self.treatment(&tag);
                    match treatment {
                        Treatment::Keep => events.push(Event::Start(tag)),
                        Treatment::AsParagraph => events.push(Event::Start(Tag::Paragraph)),
                        Treatment::Drop => {}
                        Treatment::Code => {
                            let info = match &tag {
                                Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Some(info.to_string()),
                                _ => None,
                            };
                            code = Some(PendingCode {
                                info,
                                text: String::new(),
                            });
                        }
                    }
                    stack.push(treatment);
                }
                Event::End(end) => match stack.pop() {
                    Some(Treatment::AsParagraph) => events.push(Event::End(TagEnd::Paragraph)),
                    Some(Treatment::Drop) => {}
                    _ => events.push(Event::End(end)),
                },
                Event::Rule if !self.config.thematic_breaks => {}
                other => events.push(other),
            }
        }

        html::push_html(&mut out.html, events.into_iter());
        out
    }

    fn render_code_block(&self, block: &PendingCode, errors: &mut Vec<String>) -> String {
        let plain = format!("<pre><code>{}</code></pre>\n", escape_html(&block.text));
        let Some(code_config) = &self.config.code_blocks else {
            return plain;
        };
        // Indented blocks carry no language, so they stay plain.
        let Some(info) = &block.info else {
            return plain;
        };

        let mut words = info.split_whitespace();
        let language = words
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| code_config.default_language.clone());
        let meta: Vec<&str> = words.collect();

        let mut html = String::new();
        let sandbox = self
            .config
            .sandbox
            .as_ref()
            .and_then(|s| s.preset_for_meta(meta.iter().copied()));

        let (text, token) = match sandbox {
            Some(preset) => {
                html.push_str(&format!(
                    "<p><b>Live preview ({})</b> <i>{}</i></p>\n",
                    escape_html(&preset.label),
                    escape_html(&preset.snippet_file_name)
                ));
                let text = if block.text.trim().is_empty() {
                    preset.initial_snippet_content.as_str()
                } else {
                    block.text.as_str()
                };
                let token = if self.syntax_set.find_syntax_by_token(&preset.snippet_language).is_some() {
                    preset.snippet_language.as_str()
                } else {
                    language.as_str()
                };
                (text, Some(token))
            }
            None => {
                if let Some(name) = code_config.display_name(&language) {
                    html.push_str(&format!("<p><i>{}</i></p>\n", escape_html(name)));
                }
                let token = code_config.is_registered(&language).then_some(language.as_str());
                (block.text.as_str(), token)
            }
        };

        let body = match token {
            Some(token) => match self.highlight(text, token) {
                Ok(colored) => colored,
                Err(e) => {
                    errors.push(format!("highlighting {} block failed: {}", token, e));
                    escape_html(text)
                }
            },
            None => escape_html(text),
        };

        html.push_str(&format!("<pre><code>{}</code></pre>\n", body));
        html
    }

    fn highlight(&self, code: &str, token: &str) -> Result<String, syntect::Error> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(token)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let mut out = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            for (style, piece) in highlighter.highlight_line(line, &self.syntax_set)? {
                let c = style.foreground;
                out.push_str(&format!(
                    "<font color=\"#{:02x}{:02x}{:02x}\">{}</font>",
                    c.r,
                    c.g,
                    c.b,
                    escape_html(piece)
                ));
            }
        }
        Ok(out)
    }
}

/// Wrap HTML in HelpView-compatible font tags.
pub fn wrap_html_for_helpview(html: &str) -> String {
    format!("<font face=\"Helvetica\" size=\"4\">{}</font>", html)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
