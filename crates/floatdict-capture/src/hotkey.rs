use std::fmt;

use floatdict_config::hotkey::HotkeyConfig;
use floatdict_types::HotkeyAction;

use crate::error::HotkeyError;

/// A validated accelerator in canonical form (`ctrl+alt+KeyD`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// W3C key code name, e.g. `KeyD`, `Escape`, `F9`
    pub code: String,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if self.ctrl {
            parts.push("ctrl");
        }
        if self.alt {
            parts.push("alt");
        }
        if self.shift {
            parts.push("shift");
        }
        if self.meta {
            parts.push("super");
        }
        parts.push(&self.code);
        write!(f, "{}", parts.join("+"))
    }
}

fn normalize_code(key: &str) -> Option<String> {
    let upper = key.to_ascii_uppercase();
    let chars: Vec<char> = upper.chars().collect();

    match chars.as_slice() {
        [c] if c.is_ascii_alphabetic() => return Some(format!("Key{c}")),
        [c] if c.is_ascii_digit() => return Some(format!("Digit{c}")),
        _ => {}
    }

    if let Some(rest) = upper.strip_prefix("KEY")
        && rest.len() == 1
        && rest.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Some(format!("Key{rest}"));
    }
    if let Some(rest) = upper.strip_prefix("DIGIT")
        && rest.len() == 1
        && rest.chars().all(|c| c.is_ascii_digit())
    {
        return Some(format!("Digit{rest}"));
    }
    if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<u8>().ok())
        && (1..=24).contains(&n)
    {
        return Some(format!("F{n}"));
    }

    let named = match upper.as_str() {
        "ESC" | "ESCAPE" => "Escape",
        "SPACE" => "Space",
        "ENTER" | "RETURN" => "Enter",
        "TAB" => "Tab",
        "BACKQUOTE" | "`" => "Backquote",
        _ => return None,
    };
    Some(named.to_string())
}

/// Parses `ctrl+alt+d`-style strings; modifiers are case-insensitive
pub fn parse_binding(raw: &str) -> Result<Binding, HotkeyError> {
    let invalid = |reason: &str| HotkeyError::InvalidBinding {
        binding: raw.to_string(),
        reason: reason.to_string(),
    };

    let tokens: Vec<&str> = raw.split('+').map(str::trim).collect();
    let Some((key, modifiers)) = tokens.split_last() else {
        return Err(invalid("empty"));
    };
    if key.is_empty() {
        return Err(invalid("missing key"));
    }

    let mut binding = Binding {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
        code: normalize_code(key).ok_or_else(|| invalid("unknown key"))?,
    };

    for modifier in modifiers {
        match modifier.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => binding.ctrl = true,
            "alt" | "option" => binding.alt = true,
            "shift" => binding.shift = true,
            "super" | "win" | "meta" | "cmd" => binding.meta = true,
            other => return Err(invalid(&format!("unknown modifier '{other}'"))),
        }
    }

    Ok(binding)
}

/// All four bindings, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBindings {
    pub capture_word: Binding,
    pub capture_sentence: Binding,
    pub cancel: Binding,
    pub quit: Binding,
}

impl HotkeyBindings {
    pub fn from_config(config: &HotkeyConfig) -> Result<Self, HotkeyError> {
        let bindings = Self {
            capture_word: parse_binding(&config.capture_word)?,
            capture_sentence: parse_binding(&config.capture_sentence)?,
            cancel: parse_binding(&config.cancel)?,
            quit: parse_binding(&config.quit)?,
        };

        let all = bindings.iter();
        for (i, (_, a)) in all.iter().enumerate() {
            if all[i + 1..].iter().any(|(_, b)| a == b) {
                return Err(HotkeyError::InvalidBinding {
                    binding: a.to_string(),
                    reason: "bound to more than one action".to_string(),
                });
            }
        }

        Ok(bindings)
    }

    pub fn iter(&self) -> [(HotkeyAction, &Binding); 4] {
        [
            (HotkeyAction::CaptureWord, &self.capture_word),
            (HotkeyAction::CaptureSentence, &self.capture_sentence),
            (HotkeyAction::Cancel, &self.cancel),
            (HotkeyAction::Quit, &self.quit),
        ]
    }
}

#[cfg(windows)]
pub use self::manager::HotkeyManager;

#[cfg(windows)]
mod manager {
    use std::collections::HashMap;
    use std::str::FromStr;

    use floatdict_types::HotkeyAction;
    use global_hotkey::hotkey::HotKey;
    use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

    use super::{Binding, HotkeyBindings};
    use crate::error::HotkeyError;

    /// Owns the OS registrations; must live on a thread that pumps messages
    pub struct HotkeyManager {
        manager: GlobalHotKeyManager,
        actions: HashMap<u32, HotkeyAction>,
        registered: Vec<HotKey>,
        cancel: HotKey,
        cancel_armed: bool,
    }

    fn to_hotkey(binding: &Binding) -> Result<HotKey, HotkeyError> {
        HotKey::from_str(&binding.to_string()).map_err(|e| HotkeyError::InvalidBinding {
            binding: binding.to_string(),
            reason: e.to_string(),
        })
    }

    impl HotkeyManager {
        /// Registers capture and quit hotkeys; cancel is armed on demand
        pub fn new(bindings: &HotkeyBindings) -> Result<Self, HotkeyError> {
            let manager =
                GlobalHotKeyManager::new().map_err(|e| HotkeyError::Manager(e.to_string()))?;

            let mut actions = HashMap::new();
            let mut registered = Vec::new();
            let mut cancel = None;

            for (action, binding) in bindings.iter() {
                let hotkey = to_hotkey(binding)?;
                actions.insert(hotkey.id(), action);

                if action == HotkeyAction::Cancel {
                    cancel = Some(hotkey);
                    continue;
                }

                manager
                    .register(hotkey)
                    .map_err(|e| HotkeyError::Register {
                        binding: binding.to_string(),
                        reason: e.to_string(),
                    })?;
                tracing::info!("Registered {:?} hotkey ({})", action, binding);
                registered.push(hotkey);
            }

            let cancel = cancel.ok_or_else(|| HotkeyError::Manager("no cancel binding".into()))?;

            Ok(Self {
                manager,
                actions,
                registered,
                cancel,
                cancel_armed: false,
            })
        }

        /// Registers Esc only while something is on screen
        pub fn set_cancel_armed(&mut self, armed: bool) {
            if armed == self.cancel_armed {
                return;
            }

            let result = if armed {
                self.manager.register(self.cancel)
            } else {
                self.manager.unregister(self.cancel)
            };

            match result {
                Ok(()) => self.cancel_armed = armed,
                Err(e) => tracing::warn!("Failed to toggle cancel hotkey (armed={armed}): {e}"),
            }
        }

        /// Drains pending OS events, returning the first pressed action (non-blocking)
        pub fn poll(&self) -> Option<HotkeyAction> {
            let receiver = GlobalHotKeyEvent::receiver();
            while let Ok(event) = receiver.try_recv() {
                if event.state != HotKeyState::Pressed {
                    continue;
                }
                match self.actions.get(&event.id) {
                    Some(action) => return Some(*action),
                    None => tracing::debug!("Ignoring unknown hotkey id {}", event.id),
                }
            }
            None
        }
    }

    impl Drop for HotkeyManager {
        fn drop(&mut self) {
            let _ = self.manager.unregister_all(&self.registered);
            if self.cancel_armed {
                let _ = self.manager.unregister(self.cancel);
            }
        }
    }
}
