//! Markdown report viewer for the terminal

use colored::{Color, Colorize};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

/// Renders an analysis report's Markdown as styled terminal text.
pub struct MarkdownViewer {
    use_colors: bool,
}

impl MarkdownViewer {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Empty or blank input renders to an empty string.
    pub fn render(&self, content: &str) -> String {
        if content.trim().is_empty() {
            return String::new();
        }

        let mut renderer = Renderer::new(self.use_colors);
        for event in Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH) {
            renderer.handle(event);
        }
        renderer.finish()
    }
}

struct Renderer {
    use_colors: bool,
    out: String,
    lists: Vec<Option<u64>>,
    strong: usize,
    emphasis: usize,
    heading: Option<(u8, String)>,
    at_item_start: bool,
    in_code_block: bool,
}

impl Renderer {
    fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            out: String::new(),
            lists: Vec::new(),
            strong: 0,
            emphasis: 0,
            heading: None,
            at_item_start: false,
            in_code_block: false,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        let line = format!("    {}", line);
                        let styled = self.paint(&line, Color::Cyan);
                        self.out.push_str(&styled);
                        self.out.push('\n');
                    }
                } else {
                    self.push_inline(&text);
                }
            }
            Event::Code(code) => {
                let styled = self.paint(&code, Color::Cyan);
                self.push_raw_inline(&styled, &code);
            }
            Event::SoftBreak => self.push_inline(" "),
            Event::HardBreak => {
                self.out.push('\n');
                self.indent();
            }
            Event::Rule => {
                self.block_break();
                self.out.push_str("────────────────────────────────\n");
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(level, _, _) => {
                if !self.at_item_start {
                    self.block_break();
                }
                self.heading = Some((heading_depth(level), String::new()));
            }
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.block_break();
                } else if !self.at_item_start {
                    self.line_break();
                    self.indent();
                    self.out.push_str("  ");
                }
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_break();
                } else {
                    self.line_break();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.line_break();
                self.indent();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.out.push_str(&marker);
                self.at_item_start = true;
            }
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::CodeBlock(_) => {
                self.block_break();
                self.in_code_block = true;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(..) => {
                if let Some((level, text)) = self.heading.take() {
                    let header = self.format_header(text.trim(), level);
                    self.out.push_str(&header);
                    self.out.push('\n');
                }
            }
            Tag::Paragraph => self.line_break(),
            Tag::List(_) => {
                self.lists.pop();
                self.line_break();
            }
            Tag::Item => self.line_break(),
            Tag::Strong => self.strong = self.strong.saturating_sub(1),
            Tag::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            Tag::CodeBlock(_) => self.in_code_block = false,
            Tag::Link(_, url, _) => {
                if !url.is_empty() {
                    let suffix = format!(" ({})", url);
                    let styled = self.paint(&suffix, Color::BrightBlack);
                    self.push_raw_inline(&styled, &suffix);
                }
            }
            _ => {}
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("{} {}", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("{} {}", prefix, title)
        }
    }

    fn push_inline(&mut self, text: &str) {
        let styled = self.emphasize(text);
        self.push_raw_inline(&styled, text);
    }

    /// `plain` goes into heading buffers, which are styled as a whole.
    fn push_raw_inline(&mut self, styled: &str, plain: &str) {
        self.at_item_start = false;
        match self.heading.as_mut() {
            Some((_, buffer)) => buffer.push_str(plain),
            None => self.out.push_str(styled),
        }
    }

    fn emphasize(&self, text: &str) -> String {
        if !self.use_colors || (self.strong == 0 && self.emphasis == 0) {
            return text.to_string();
        }
        let mut styled = text.normal();
        if self.strong > 0 {
            styled = styled.bold();
        }
        if self.emphasis > 0 {
            styled = styled.italic();
        }
        styled.to_string()
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn indent(&mut self) {
        let depth = self.lists.len().saturating_sub(1);
        self.out.push_str(&"  ".repeat(depth));
    }

    fn line_break(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn block_break(&mut self) {
        if self.out.is_empty() {
            return;
        }
        self.line_break();
        if !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn finish(self) -> String {
        let mut out = self.out.trim_end().to_string();
        out.push('\n');
        out
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        _ => 3,
    }
}
