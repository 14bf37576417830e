use std::str::FromStr;

use serde::Deserialize;

/// One sort button on the page
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Missing IDs are allowed here so that a broken entry shows up as a button that refuses to
    /// sort, instead of failing the whole config.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl PlaylistEntry {
    pub fn new(id: &str, name: Option<&str>) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.map(str::to_string),
        }
    }

    pub fn label(&self) -> String {
        match (&self.name, &self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.clone(),
            (None, None) => "(unnamed playlist)".to_string(),
        }
    }
}

/// Parses `ID` or `ID=NAME`
impl FromStr for PlaylistEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, name) = match s.split_once('=') {
            Some((id, name)) => (id.trim(), Some(name.trim()).filter(|n| !n.is_empty())),
            None => (s.trim(), None),
        };
        if id.is_empty() {
            return Err(format!("Playlist `{s}` has no ID"));
        }
        Ok(Self::new(id, name))
    }
}

/// Describes the page the sort buttons live on
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Marker class of the sort buttons
    pub sort_button_class: String,
    /// Attribute on each button holding the playlist ID
    pub id_attribute: String,
    /// ID of the element shown while a sort is running
    pub overlay_id: String,
    pub overlay_label: String,
    pub playlists: Vec<PlaylistEntry>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sort_button_class: "sort-btn".to_string(),
            id_attribute: "data-playlist-id".to_string(),
            overlay_id: "overlay".to_string(),
            overlay_label: "Sorting playlist, this may take a while...".to_string(),
            playlists: vec![],
        }
    }
}
