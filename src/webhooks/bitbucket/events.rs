use serde::{Deserialize, Deserializer};

mod comment;
mod commit_status;
mod pull_request;
mod push;

pub use comment::*;
pub use commit_status::*;
pub use pull_request::*;
pub use push::*;

/// Bitbucket omits keys or sends `null` for anything that isn't set (a deleted branch has no
/// `new` state, an open PR has no `closed_by`...). Both decode to the empty value.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Default, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "nullable")]
    pub display_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub links: UserLinks,
}

impl User {
    pub fn avatar(&self) -> &str {
        &self.links.avatar.href
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserLinks {
    #[serde(default, deserialize_with = "nullable")]
    pub avatar: Link,
}

#[derive(Debug, Default, Deserialize)]
pub struct Link {
    #[serde(default, deserialize_with = "nullable")]
    pub href: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HtmlLinks {
    #[serde(default, deserialize_with = "nullable")]
    pub html: Link,
}

#[derive(Debug, Default, Deserialize)]
pub struct Repository {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub full_name: String,
}
