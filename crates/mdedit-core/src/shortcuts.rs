//! Keyboard shortcuts.
//!
//! Hosts translate their native key events into [`KeyPress`] and call [`resolve`]. Only
//! Alt-chords, editing keys and heading digits are claimed; everything else is left to the host.

use crate::toolbar::{Command, DropdownCommand, EditCommand, FormatCommand};
use crate::view::Dropdown;

/// A key, independent of any terminal or windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
}

/// A key plus the Alt modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Whether Alt (Option) was held.
    pub alt: bool,
}

impl KeyPress {
    /// Unmodified key.
    pub fn plain(key: Key) -> Self {
        Self { key, alt: false }
    }

    /// Alt + `c`.
    pub fn alt(c: char) -> Self {
        Self {
            key: Key::Char(c),
            alt: true,
        }
    }
}

/// What a key press means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortcut {
    /// Run a toolbar command.
    Toolbar(Command),
    /// Open the global search modal.
    OpenSearch,
    /// Escape: close whatever overlay is on top.
    Dismiss,
}

/// Shortcut help shown by [`Command::ShowShortcuts`], as `(keys, action)` pairs.
pub const SHORTCUT_HELP: &[(&str, &str)] = &[
    ("Alt+B", "Bold"),
    ("Alt+I", "Italic"),
    ("Alt+S", "Strikethrough"),
    ("Alt+`", "Inline code"),
    ("Alt+Q", "Quote"),
    ("Alt+U", "Bullet list"),
    ("Alt+O", "Numbered list"),
    ("Alt+-", "Horizontal rule"),
    ("Alt+L", "Link to article"),
    ("Alt+H", "Heading menu (then 1-6)"),
    ("Alt+K", "Search"),
];

/// Map a key press to a shortcut.
///
/// `open_dropdown` is the toolbar's current dropdown: while the heading menu is open, the digits
/// 1-6 insert that heading level.
pub fn resolve(press: KeyPress, open_dropdown: Option<Dropdown>) -> Option<Shortcut> {
    if press.alt {
        let Key::Char(c) = press.key else {
            return None;
        };
        return alt_chord(c.to_ascii_lowercase());
    }

    match press.key {
        Key::Enter => Some(Shortcut::Toolbar(Command::Edit(EditCommand::Newline))),
        Key::Backspace => Some(Shortcut::Toolbar(Command::Edit(EditCommand::DeleteBackward))),
        Key::Escape => Some(Shortcut::Dismiss),
        Key::Char(c @ '1'..='6') if open_dropdown == Some(Dropdown::Heading) => {
            let level = c as u8 - b'0';
            Some(Shortcut::Toolbar(Command::Format(FormatCommand::Heading {
                level,
            })))
        }
        _ => None,
    }
}

fn alt_chord(c: char) -> Option<Shortcut> {
    let format = |command| Some(Shortcut::Toolbar(Command::Format(command)));
    let toggle = |dropdown| {
        Some(Shortcut::Toolbar(Command::Dropdown(DropdownCommand::Toggle(
            dropdown,
        ))))
    };

    match c {
        'b' => format(FormatCommand::Bold),
        'i' => format(FormatCommand::Italic),
        's' => format(FormatCommand::Strikethrough),
        '`' => format(FormatCommand::InlineCode),
        'q' => format(FormatCommand::Quote),
        'u' => format(FormatCommand::UnorderedList),
        'o' => format(FormatCommand::OrderedList),
        '-' => format(FormatCommand::HorizontalRule),
        'l' => toggle(Dropdown::Article),
        'h' => toggle(Dropdown::Heading),
        'k' => Some(Shortcut::OpenSearch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alt_chords() {
        assert_eq!(
            resolve(KeyPress::alt('B'), None),
            Some(Shortcut::Toolbar(Command::Format(FormatCommand::Bold)))
        );
        assert_eq!(resolve(KeyPress::alt('k'), None), Some(Shortcut::OpenSearch));
        assert_eq!(resolve(KeyPress::alt('z'), None), None);
    }

    #[test]
    fn test_heading_digits_only_with_menu_open() {
        let digit = KeyPress::plain(Key::Char('3'));
        assert_eq!(resolve(digit, None), None);
        assert_eq!(
            resolve(digit, Some(Dropdown::Heading)),
            Some(Shortcut::Toolbar(Command::Format(FormatCommand::Heading {
                level: 3
            })))
        );
        assert_eq!(
            resolve(KeyPress::plain(Key::Char('7')), Some(Dropdown::Heading)),
            None
        );
    }

    #[test]
    fn test_enter_and_escape() {
        assert_eq!(
            resolve(KeyPress::plain(Key::Enter), None),
            Some(Shortcut::Toolbar(Command::Edit(EditCommand::Newline)))
        );
        assert_eq!(
            resolve(KeyPress::plain(Key::Escape), Some(Dropdown::Media)),
            Some(Shortcut::Dismiss)
        );
    }
}
