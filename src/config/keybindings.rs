use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{Deserialize, Deserializer};

use crate::action::Action;

/// Maps a single key press to an action. Keys are written as `<Ctrl-c>`, `<Enter>`, `<Shift-g>`
/// and so on; the surrounding angle brackets are optional.
#[derive(Clone, Debug, Deref, DerefMut, Default)]
pub struct KeyBindings(pub HashMap<KeyEvent, Action>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, Action>::deserialize(deserializer)?;

        let mut keybindings = HashMap::with_capacity(parsed_map.len());
        for (key, action) in parsed_map {
            let event = Self::parse_key(&key).map_err(serde::de::Error::custom)?;
            keybindings.insert(event, action);
        }
        Ok(KeyBindings(keybindings))
    }
}

impl KeyBindings {
    /// Looks up the action bound to a key press. Only the code and the modifiers are compared,
    /// since terminals disagree on the other fields.
    pub fn action_for(&self, key: &KeyEvent) -> Option<&Action> {
        self.0.get(&KeyEvent::new(key.code, key.modifiers))
    }

    /// Returns a printable form of one key bound to the action, e.g. `<Enter>`
    pub fn find_key_str(&self, action: &Action) -> Option<String> {
        let mut keys: Vec<String> = self
            .0
            .iter()
            .filter(|(_, bound)| *bound == action)
            .map(|(key, _)| Self::key_event_to_string(key))
            .collect();
        // Stable choice when several keys share an action
        keys.sort_by_key(|k| (k.len(), k.clone()));
        keys.into_iter().next().map(|k| format!("<{k}>"))
    }

    pub fn key_event_to_string(key_event: &KeyEvent) -> String {
        let char;
        let key_code = match key_event.code {
            KeyCode::Backspace => "Backspace",
            KeyCode::Enter => "Enter",
            KeyCode::Left => "Left",
            KeyCode::Right => "Right",
            KeyCode::Up => "Up",
            KeyCode::Down => "Down",
            KeyCode::Home => "Home",
            KeyCode::End => "End",
            KeyCode::PageUp => "PageUp",
            KeyCode::PageDown => "PageDown",
            KeyCode::Tab => "Tab",
            KeyCode::BackTab => "Backtab",
            KeyCode::Delete => "Delete",
            KeyCode::Insert => "Insert",
            KeyCode::F(c) => {
                char = format!("f({c})");
                &char
            }
            KeyCode::Char(' ') => "Space",
            KeyCode::Char(c) => {
                char = c.to_lowercase().to_string();
                &char
            }
            KeyCode::Esc => "Esc",
            _ => "",
        };

        let mut modifiers = Vec::with_capacity(3);
        if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
            modifiers.push("Ctrl");
        }
        if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
            modifiers.push("Shift");
        }
        if key_event.modifiers.intersects(KeyModifiers::ALT) {
            modifiers.push("Alt");
        }

        let mut key = modifiers.join("-");
        if !key.is_empty() {
            key.push('-');
        }
        key.push_str(key_code);
        key
    }

    fn parse_key_code_with_modifiers(
        raw: &str,
        mut modifiers: KeyModifiers,
    ) -> Result<KeyEvent, String> {
        let c = match raw {
            "esc" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "backtab" => {
                modifiers.insert(KeyModifiers::SHIFT);
                KeyCode::BackTab
            }
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "insert" => KeyCode::Insert,
            "space" => KeyCode::Char(' '),
            "tab" => KeyCode::Tab,
            f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
                Ok(n @ 1..=12) => KeyCode::F(n),
                _ => return Err(format!("Unable to parse {raw}")),
            },
            c if c.chars().count() == 1 => {
                let Some(mut c) = c.chars().next() else {
                    return Err(format!("Unable to parse {raw}"));
                };
                if modifiers.contains(KeyModifiers::SHIFT) {
                    c = c.to_ascii_uppercase();
                }
                KeyCode::Char(c)
            }
            _ => return Err(format!("Unable to parse {raw}")),
        };
        Ok(KeyEvent::new(c, modifiers))
    }

    fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
        let mut modifiers = KeyModifiers::empty();
        let mut current = raw;

        loop {
            if let Some(rest) = current.strip_prefix("ctrl-") {
                modifiers.insert(KeyModifiers::CONTROL);
                current = rest;
            } else if let Some(rest) = current.strip_prefix("alt-") {
                modifiers.insert(KeyModifiers::ALT);
                current = rest;
            } else if let Some(rest) = current.strip_prefix("shift-") {
                modifiers.insert(KeyModifiers::SHIFT);
                current = rest;
            } else {
                break;
            }
        }

        (current, modifiers)
    }

    pub fn parse_key(raw: &str) -> Result<KeyEvent, String> {
        let trimmed = raw.strip_prefix('<').unwrap_or(raw);
        let trimmed = trimmed.strip_suffix('>').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(format!("Unable to parse `{raw}`"));
        }
        let lower = trimmed.to_ascii_lowercase();
        let (remaining, modifiers) = Self::extract_modifiers(&lower);
        Self::parse_key_code_with_modifiers(remaining, modifiers)
    }
}
