use std::fmt::Write;

use matrix_sdk::ruma::events::room::message::MessageEventContent;
use url::Url;

use crate::bot::message::Message;

const SEPARATOR: &str = "⋅";
const INDENT: &str = "    ";
const MXC_SCHEME: &str = "mxc://";

enum Style {
    Bold,
    Span,
}

impl Style {
    fn close(&self) -> &'static str {
        match self {
            Self::Bold => "</b>",
            Self::Span => "</span>",
        }
    }
}

/// Writes a message as both plain text and HTML for Matrix.
#[derive(Default)]
pub struct MessageBuilder {
    pub(crate) html: String,
    pub(crate) plain: String,
    style_stack: Vec<Style>,
    pub(crate) url: Option<Url>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Lays out a [`Message`]: colored bold title (linked when the message has a valid URL), the
    /// author, the description, then one line per field.
    pub fn from_message(message: &Message) -> Self {
        let mut builder = Self::new();

        builder.color(&message.color.hex());
        builder.bold();
        match message.url.as_deref().map(Url::parse) {
            Some(Ok(url)) => builder.main_link(&message.title, &url),
            _ => write!(builder, "{}", message.title).unwrap(),
        }
        builder.close_styles();

        if let Some(author) = &message.author {
            write!(builder, " (by ").unwrap();
            // Matrix clients only load images from the homeserver, other avatars are left out
            if author.icon_url.starts_with(MXC_SCHEME) {
                builder.inline_image(&author.icon_url);
            }
            write!(builder, "{})", author.name).unwrap();
        }

        if let Some(description) = &message.description {
            builder.line_break();
            write!(builder, "{}", description).unwrap();
        }

        for field in &message.fields {
            builder.line_break();
            builder.bold();
            write!(builder, "{}:", field.name.trim_end_matches(':')).unwrap();
            builder.close_last();

            for (i, line) in field.value.lines().enumerate() {
                if i == 0 {
                    write!(builder, " {}", line).unwrap();
                } else {
                    builder.line_break();
                    write!(builder, "{}{}", INDENT, line).unwrap();
                }
            }
        }

        builder
    }

    pub fn build(mut self) -> MessageEventContent {
        // Append main URL to plain text message, if we have one
        if let Some(url) = self.url {
            write!(self.plain, " {} {}", SEPARATOR, url).unwrap();
        }

        MessageEventContent::text_html(self.plain, self.html)
    }

    pub fn bold(&mut self) {
        self.html.push_str("<b>");
        self.style_stack.push(Style::Bold);
    }

    pub fn color(&mut self, color: &str) {
        write!(self.html, r#"<span style="color: {}">"#, color).unwrap();
        self.style_stack.push(Style::Span);
    }

    /// Small image shown in the HTML body only
    pub fn inline_image(&mut self, src: &str) {
        self.html.push_str(r#"<img height="16" src=""#);
        push_escaped(&mut self.html, src);
        self.html.push_str(r#""> "#);
    }

    pub fn line_break(&mut self) {
        self.plain.push('\n');
        self.html.push_str("<br>");
    }

    pub fn link(&mut self, text: &str, href: &Url) {
        // NOTE: we consider that the URL is bonus information, not needed in plain text mode to
        // understand the message
        self.plain.push_str(text);

        write!(self.html, r#"<a href="{}">"#, href).unwrap();
        push_escaped(&mut self.html, text);
        self.html.push_str("</a>");
    }

    /// Format the provided text as an anchor tag, and set the URL to be appended at the end of the
    /// plain text message
    pub fn main_link(&mut self, text: &str, href: &Url) {
        self.link(text, href);
        self.url = Some(href.clone());
    }

    /// Does nothing if no style is open
    pub fn close_last(&mut self) {
        if let Some(style) = self.style_stack.pop() {
            self.html.push_str(style.close());
        }
    }

    pub fn close_styles(&mut self) {
        while !self.style_stack.is_empty() {
            self.close_last();
        }
    }
}

/// Escapes characters that have a special meaning in HTML. Shamelessly adapted from
/// rustdoc/html/escape.rs
fn push_escaped(html: &mut String, s: &str) {
    let mut last = 0;
    for (i, c) in s.char_indices() {
        let escaped = match c {
            '>' => "&gt;",
            '<' => "&lt;",
            '&' => "&amp;",
            '\'' => "&#39;",
            '"' => "&quot;",
            _ => continue,
        };

        html.push_str(&s[last..i]);
        html.push_str(escaped);
        last = i + 1;
    }

    if last < s.len() {
        html.push_str(&s[last..]);
    }
}

impl std::fmt::Write for MessageBuilder {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.plain.push_str(s);
        push_escaped(&mut self.html, s);

        Ok(())
    }
}

impl std::convert::From<&Message> for MessageEventContent {
    fn from(message: &Message) -> Self {
        MessageBuilder::from_message(message).build()
    }
}
