//! Help overlay scrolling

use crate::app::state::ModalState;

use super::super::App;

impl App {
    pub(crate) fn help_scroll_down(&mut self) {
        if let ModalState::Help {
            scroll,
            keybindings,
        } = &mut self.state.modal
        {
            // Each keybinding is 1 line, plus category headers (2 lines each)
            let mut categories = 0;
            let mut last_category = "";
            for kb in keybindings.iter() {
                if kb.category != last_category {
                    categories += 1;
                    last_category = kb.category;
                }
            }
            let content_lines = keybindings.len() + categories * 2;
            let max_scroll = content_lines.saturating_sub(10); // Approx visible area

            if *scroll < max_scroll {
                *scroll = scroll.saturating_add(1);
            }
        }
    }

    pub(crate) fn help_scroll_up(&mut self) {
        if let ModalState::Help { scroll, .. } = &mut self.state.modal {
            *scroll = scroll.saturating_sub(1);
        }
    }
}
