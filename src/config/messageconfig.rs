use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Shown when the server answers with anything other than a success status
    pub generic_failure: String,
    /// Shown when the server could not be reached or gave an unreadable answer
    pub transport_failure: String,
    /// If false, transport errors are only logged
    pub notify_on_transport_error: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            generic_failure: "Sorting failed. Sorry!".to_string(),
            transport_failure: "Could not reach the sorting server. Sorting failed.".to_string(),
            notify_on_transport_error: true,
        }
    }
}
