/// Modifier held together with the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Super,
}

/// A parsed key descriptor such as `ctrl+shift+f9` or `scroll lock`.
///
/// Key names are lowercased with `_` and `-` read as spaces, so
/// `Page_Up`, `page-up` and `page up` are the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl KeyDescriptor {
    /// `None` for empty tokens, several non-modifier keys, or no key at all.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let mut modifiers = Vec::new();
        let mut key = None;

        for token in descriptor.split('+') {
            let token = normalize(token);
            if token.is_empty() {
                return None;
            }

            match modifier(&token) {
                Some(m) => {
                    if !modifiers.contains(&m) {
                        modifiers.push(m);
                    }
                }
                None if key.is_none() => key = Some(token),
                None => return None,
            }
        }

        key.map(|key| Self { modifiers, key })
    }

    pub fn is_plain(&self) -> bool {
        self.modifiers.is_empty()
    }
}

fn normalize(token: &str) -> String {
    token
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn modifier(token: &str) -> Option<Modifier> {
    match token {
        "ctrl" | "control" => Some(Modifier::Ctrl),
        "shift" => Some(Modifier::Shift),
        "alt" | "option" => Some(Modifier::Alt),
        "windows" | "win" | "super" | "cmd" | "command" | "meta" => Some(Modifier::Super),
        _ => None,
    }
}
