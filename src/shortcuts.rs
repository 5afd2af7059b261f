use egui::{Key, Modifiers};

/// Keyboard actions available on the visualiser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    Clear,
    ShrinkBrush,
    GrowBrush,
}

impl Shortcut {
    pub const ALL_KEYS: [Key; 5] = [Key::Z, Key::Y, Key::K, Key::OpenBracket, Key::CloseBracket];

    /// Resolve a key press; `modifiers.command` is Ctrl, or Cmd on macOS
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        match key {
            Key::Z if modifiers.command && modifiers.shift => Some(Self::Redo),
            Key::Z if modifiers.command => Some(Self::Undo),
            Key::Y if modifiers.command => Some(Self::Redo),
            Key::K if modifiers.command => Some(Self::Clear),
            Key::OpenBracket if !modifiers.command => Some(Self::ShrinkBrush),
            Key::CloseBracket if !modifiers.command => Some(Self::GrowBrush),
            _ => None,
        }
    }

    /// Every shortcut pressed this frame, in key order
    pub fn pressed(ctx: &egui::Context) -> Vec<Self> {
        ctx.input(|input| {
            Self::ALL_KEYS
                .iter()
                .filter(|key| input.key_pressed(**key))
                .filter_map(|key| Self::from_key(*key, input.modifiers))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_bindings() {
        assert_eq!(Shortcut::from_key(Key::Z, Modifiers::COMMAND), Some(Shortcut::Undo));
        assert_eq!(
            Shortcut::from_key(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT),
            Some(Shortcut::Redo)
        );
        assert_eq!(Shortcut::from_key(Key::Y, Modifiers::COMMAND), Some(Shortcut::Redo));
        assert_eq!(Shortcut::from_key(Key::Z, Modifiers::NONE), None);
    }

    #[test]
    fn clear_and_brush_size() {
        assert_eq!(Shortcut::from_key(Key::K, Modifiers::COMMAND), Some(Shortcut::Clear));
        assert_eq!(Shortcut::from_key(Key::OpenBracket, Modifiers::NONE), Some(Shortcut::ShrinkBrush));
        assert_eq!(Shortcut::from_key(Key::CloseBracket, Modifiers::NONE), Some(Shortcut::GrowBrush));
        assert_eq!(Shortcut::from_key(Key::K, Modifiers::NONE), None);
    }
}
