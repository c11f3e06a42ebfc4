use crate::error::{CivicError, Result};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Text of the update entry every issue is born with.
pub const SEED_UPDATE_TEXT: &str = "Issue reported";

/// Extension used for photos whose original name carries none.
const DEFAULT_PHOTO_EXT: &str = ".jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Category {
    Roads,
    Lighting,
    Waste,
    Water,
    Safety,
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Roads,
        Category::Lighting,
        Category::Waste,
        Category::Water,
        Category::Safety,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Roads => "roads",
            Category::Lighting => "lighting",
            Category::Waste => "waste",
            Category::Water => "water",
            Category::Safety => "safety",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Roads => "Pothole / Road Damage",
            Category::Lighting => "Street Light",
            Category::Waste => "Garbage / Waste",
            Category::Water => "Water / Drainage",
            Category::Safety => "Public Safety",
            Category::Other => "Other",
        }
    }

    /// Marker color as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Roads => "#ef4444",
            Category::Lighting => "#f59e0b",
            Category::Waste => "#10b981",
            Category::Water => "#3b82f6",
            Category::Safety => "#8b5cf6",
            Category::Other => "#6b7280",
        }
    }

    /// Like `parse`, but unknown ids fall into `Other`.
    pub fn from_id_lossy(id: &str) -> Self {
        id.parse().unwrap_or(Category::Other)
    }
}

impl From<String> for Category {
    fn from(id: String) -> Self {
        Self::from_id_lossy(&id)
    }
}

impl FromStr for Category {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .find(|c| c.as_str() == wanted)
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                CivicError::Validation(format!(
                    "Unknown category '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an issue. Any transition is allowed, including going back
/// from `Resolved` to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
}

impl Default for Status {
    fn default() -> Self {
        Self::Open
    }
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Resolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Status {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Status::ALL
            .iter()
            .find(|st| st.as_str() == wanted)
            .copied()
            .ok_or_else(|| {
                CivicError::Validation(format!(
                    "Unknown status '{}' (expected open, in_progress or resolved)",
                    s
                ))
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"`.
impl FromStr for Coordinates {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CivicError::Validation(format!("Invalid coordinates '{}'", s));
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(CivicError::Validation(format!(
                "Coordinates out of range: {}",
                s
            )));
        }
        Ok(Self { lat, lng })
    }
}

/// One entry of an issue's append-only update log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntry {
    #[serde(
        rename = "ts",
        alias = "timestamp",
        with = "chrono::serde::ts_milliseconds"
    )]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub status: Status,
}

impl UpdateEntry {
    pub fn new(text: impl Into<String>, status: Status) -> Self {
        // Persisted with millisecond precision.
        Self {
            timestamp: Utc::now().trunc_subsecs(3),
            text: text.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: Status,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: String,
    pub image_path: Option<String>,
    pub votes: u64,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updates: Vec<UpdateEntry>,
}

// Records written by older clients may miss any of the optional fields or
// carry a category we no longer know; read them the way they were meant.
impl<'de> Deserialize<'de> for Issue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = IssueHelper::deserialize(deserializer)?;

        Ok(Issue {
            id: helper.id,
            title: helper.title,
            description: helper.description,
            category: helper.category.unwrap_or_default(),
            status: helper.status.unwrap_or_default(),
            lat: helper.lat,
            lng: helper.lng,
            address: helper.address.unwrap_or_default(),
            image_path: helper.image_path,
            votes: helper.votes.unwrap_or(0),
            created_at: helper.created_at,
            created_by: helper.created_by,
            updates: helper.updates,
        })
    }
}

#[derive(Deserialize)]
struct IssueHelper {
    id: Uuid,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    votes: Option<u64>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    created_by: String,
    #[serde(default)]
    updates: Vec<UpdateEntry>,
}

impl Issue {
    /// Builds a fresh open issue from a draft. The photo, if any, is not
    /// attached here: its stored name depends on the id generated below.
    pub fn new(draft: &NewIssue, created_by: &str) -> Self {
        let (lat, lng) = match draft.location {
            Some(c) => (Some(c.lat), Some(c.lng)),
            None => (None, None),
        };
        Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            category: draft.category,
            status: Status::Open,
            lat,
            lng,
            address: draft.address.trim().to_string(),
            image_path: None,
            votes: 0,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            updates: vec![UpdateEntry::new(SEED_UPDATE_TEXT, Status::Open)],
        }
    }

    /// Coordinates, treating absent or zero values as "not located yet".
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    pub fn set_coordinates(&mut self, coords: Coordinates) {
        self.lat = Some(coords.lat);
        self.lng = Some(coords.lng);
    }

    /// True when the issue has an address we could geocode but no position.
    pub fn needs_geocoding(&self) -> bool {
        self.coordinates().is_none() && !self.address.trim().is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }

    pub fn is_owned_by(&self, session_id: &str) -> bool {
        self.created_by == session_id
    }

    /// Lowercased text searched by free-text filters.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.address).to_lowercase()
    }
}

/// Raw photo bytes as picked by the reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Extension of the original file, dot included.
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| DEFAULT_PHOTO_EXT.to_string())
    }

    /// Name the photo is stored under for the given issue.
    pub fn stored_name(&self, id: &Uuid) -> String {
        format!("{}{}", id, self.extension())
    }
}

/// Everything a reporter submits when filing an issue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: Option<Coordinates>,
    pub address: String,
    pub photo: Option<PhotoUpload>,
}

impl NewIssue {
    pub fn new(title: impl Into<String>, description: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_photo(mut self, photo: PhotoUpload) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(CivicError::Validation(
                "Please fill Title and Description.".to_string(),
            ));
        }
        Ok(())
    }
}
