use serde::{Deserialize, Serialize};

/// Visibility of an avatar. `All` is only meaningful as a search filter;
/// avatar bodies without a recognised status read as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Public,
    Private,
    Hidden,
    All,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseStatus::Public => write!(f, "public"),
            ReleaseStatus::Private => write!(f, "private"),
            ReleaseStatus::Hidden => write!(f, "hidden"),
            ReleaseStatus::All => write!(f, "all"),
            ReleaseStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: String,
    pub name: String,
    #[serde(rename = "authorName", default)]
    pub author_name: String,
    #[serde(rename = "authorId", default)]
    pub author_id: Option<String>,
    #[serde(rename = "thumbnailImageUrl", default)]
    pub thumbnail_image_url: String,
    #[serde(default)]
    pub version: i64,
    #[serde(rename = "releaseStatus", default)]
    pub release_status: ReleaseStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Avatar {
    pub fn summary(&self) -> AvatarSummary<'_> {
        AvatarSummary {
            id: &self.id,
            name: &self.name,
            author_name: &self.author_name,
            thumbnail_image_url: &self.thumbnail_image_url,
            version: self.version,
        }
    }
}

/// The fields printed when listing or showing an avatar.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AvatarSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(rename = "authorName")]
    pub author_name: &'a str,
    #[serde(rename = "thumbnailImageUrl")]
    pub thumbnail_image_url: &'a str,
    pub version: i64,
}

/// Query parameters for `GET /avatars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarQuery {
    pub user: String,
    #[serde(rename = "releaseStatus")]
    pub release_status: ReleaseStatus,
    pub n: usize,
    pub offset: usize,
}

impl AvatarQuery {
    /// One page of the signed-in user's own avatars, any release status
    pub fn own(n: usize, offset: usize) -> Self {
        Self {
            user: "me".to_string(),
            release_status: ReleaseStatus::All,
            n,
            offset,
        }
    }
}
