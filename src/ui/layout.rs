use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
pub const LOG_PANE_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Rect,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        if full_screen {
            let [main] = Layout::vertical([Constraint::Fill(1)]).areas(area);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main,
                logs: Rect::ZERO,
                status: Rect::ZERO,
            };
        }

        let [tab, body, status] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);

        let (main, logs) = if show_logs {
            let [main, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Percentage(LOG_PANE_PERCENT),
            ])
            .areas(body);
            (main, logs)
        } else {
            (body, Rect::ZERO)
        };

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            logs,
            status,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_uses_the_whole_area() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        layout.update(Rect::new(0, 0, 80, 24), true, true);
        assert_eq!(layout.main, Rect::new(0, 0, 80, 24));
        assert_eq!(layout.logs, Rect::ZERO);
    }

    #[test]
    fn log_pane_takes_space_from_main() {
        let mut layout = LayoutAreas::new(Size::new(80, 40));
        let without = layout.main.height;
        layout.update(Rect::new(0, 0, 80, 40), false, true);
        assert!(layout.logs.height > 0);
        assert_eq!(layout.main.height + layout.logs.height, without);
        assert_eq!(layout.status.height, STATUS_HEIGHT);
    }
}
