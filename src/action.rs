use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{overlay::Ticket, sortclient::outcome::SortReply};

#[derive(Debug, Clone, PartialEq, Display, Serialize, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),

    // Movement within the list of sort buttons
    Up,
    Down,
    Top,
    Bottom,
    /// Press the selected sort button, or close the notification if one is shown
    Click,
    /// Close the notification currently shown
    Dismiss,

    /// A sort request task finished
    #[serde(skip)]
    SortSettled { ticket: Ticket, reply: SortReply },
    /// A sort request task went away without reporting back
    #[serde(skip)]
    SortAbandoned(Ticket),
}
