/// The five colors a notification can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Success,
    Failure,
    PrCreated,
    PrUpdated,
    Gray,
}

impl Color {
    pub fn rgb(self) -> u32 {
        match self {
            Self::Success => 0x90EE90,
            Self::Failure => 0xD10000,
            Self::PrCreated => 0x89CFF0,
            Self::PrUpdated => 0x0047AB,
            Self::Gray => 0x979797,
        }
    }

    /// CSS notation, e.g. `#90ee90`
    pub fn hex(self) -> String {
        format!("#{:06x}", self.rgb())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub icon_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// Renderer-agnostic notification: what the bot turns into a chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub color: Color,
    pub author: Option<Author>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub fields: Vec<Field>,
}

impl Message {
    pub fn new(title: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.into(),
            color,
            author: None,
            description: None,
            url: None,
            fields: Vec::new(),
        }
    }

    /// Sets the author, unless `name` is empty.
    pub fn author(mut self, name: &str, icon_url: &str) -> Self {
        if !name.is_empty() {
            self.author = Some(Author {
                name: name.to_owned(),
                icon_url: icon_url.to_owned(),
            });
        }
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the click-through URL, unless `url` is empty.
    pub fn url(mut self, url: &str) -> Self {
        if !url.is_empty() {
            self.url = Some(url.to_owned());
        }
        self
    }

    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.to_owned(),
            value: value.into(),
        });
        self
    }

    /// Appends a field, unless `value` is empty.
    pub fn non_empty_field(self, name: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.field(name, value)
        }
    }

    /// Describes the branches of a pull request as "`source` > `destination`", when both are
    /// known.
    pub fn branches(self, source: &str, destination: &str) -> Self {
        if source.is_empty() || destination.is_empty() {
            self
        } else {
            self.description(format!("`{}` > `{}`", source, destination))
        }
    }
}
