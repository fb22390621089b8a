use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::view::KeyInput;

/// Represents a key binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    pub fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn with_ctrl_shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// What the host does with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the active view.
    View(KeyInput),
    /// Open a new root window.
    NewWindow,
    Quit,
}

/// Maps crossterm key events to actions.
pub struct KeyMapper {
    bindings: HashMap<KeyBinding, KeyAction>,
}

impl KeyMapper {
    pub fn new(tab_as_ctrl_enter: bool) -> Self {
        let mut mapper = Self {
            bindings: HashMap::new(),
        };
        mapper.setup_default_bindings();
        if tab_as_ctrl_enter {
            mapper.bind(KeyBinding::new(KeyCode::Tab), KeyAction::View(KeyInput::CtrlEnter));
        }
        mapper
    }

    fn bind(&mut self, binding: KeyBinding, action: KeyAction) {
        self.bindings.insert(binding, action);
    }

    fn setup_default_bindings(&mut self) {
        use KeyAction::View;

        self.bind(KeyBinding::new(KeyCode::Esc), View(KeyInput::Escape));
        self.bind(KeyBinding::new(KeyCode::Enter), View(KeyInput::Enter));
        self.bind(KeyBinding::with_ctrl(KeyCode::Enter), View(KeyInput::CtrlEnter));
        // Most terminals deliver Ctrl+Enter as Ctrl+J
        self.bind(KeyBinding::with_ctrl(KeyCode::Char('j')), View(KeyInput::CtrlEnter));
        self.bind(KeyBinding::new(KeyCode::Backspace), View(KeyInput::Backspace));
        self.bind(KeyBinding::new(KeyCode::Delete), View(KeyInput::Delete));

        self.bind(KeyBinding::with_ctrl(KeyCode::Char('z')), View(KeyInput::Undo));
        self.bind(KeyBinding::with_ctrl(KeyCode::Char('y')), View(KeyInput::Redo));
        self.bind(KeyBinding::with_ctrl_shift(KeyCode::Char('z')), View(KeyInput::Redo));
        self.bind(KeyBinding::with_ctrl_shift(KeyCode::Char('Z')), View(KeyInput::Redo));

        self.bind(KeyBinding::with_ctrl(KeyCode::Char('t')), KeyAction::NewWindow);
        self.bind(KeyBinding::with_ctrl(KeyCode::Char('q')), KeyAction::Quit);
        self.bind(KeyBinding::with_ctrl(KeyCode::Char('c')), KeyAction::Quit);
    }

    /// Bound action for `event`; otherwise plain (or shifted) characters
    /// are typed into the active view.
    pub fn map(&self, event: &KeyEvent) -> Option<KeyAction> {
        if let Some(action) = self.bindings.get(&KeyBinding::from_event(event)) {
            return Some(*action);
        }
        match event.code {
            KeyCode::Char(c) if (event.modifiers - KeyModifiers::SHIFT).is_empty() => {
                Some(KeyAction::View(KeyInput::Char(c)))
            }
            _ => None,
        }
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new(true)
    }
}
