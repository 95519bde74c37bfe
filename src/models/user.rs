//! User model shared by posts, comments and the identity provider.

use serde::{Deserialize, Serialize};
use url::Url;

/// Author or acting user.
///
/// The id is the identity provider's stable user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity provider user id
    pub id: String,
    /// Display name
    pub name: String,
    /// Profile photo URL
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Url>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: None,
        }
    }
}
