use ratatui::layout::{Constraint, Layout, Rect};

pub struct ScreenLayout {
    pub tabs: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, footer_height: u16) -> Self {
        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(footer_height),
        ])
        .split(area);

        Self {
            tabs: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Areas for a view's panes in tab order: the first pane is a sidebar of
/// `sidebar_width` columns, the rest share the remaining space top to bottom.
pub fn pane_areas(area: Rect, count: usize, sidebar_width: u16) -> Vec<Rect> {
    match count {
        0 => Vec::new(),
        1 => vec![area],
        _ => {
            // Keep at least a third of the screen for the stacked panes.
            let sidebar_width = sidebar_width.min(area.width.saturating_mul(2) / 3);
            let horizontal =
                Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(1)])
                    .split(area);

            let rest = count - 1;
            let constraints = (0..rest).map(|_| Constraint::Ratio(1, rest as u32));
            let stacked = Layout::vertical(constraints).split(horizontal[1]);

            let mut areas = Vec::with_capacity(count);
            areas.push(horizontal[0]);
            areas.extend(stacked.iter().copied());
            areas
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_layout_rows() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 80, 24), 1);
        assert_eq!(layout.tabs, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.main, Rect::new(0, 1, 80, 22));
        assert_eq!(layout.footer, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_three_panes_sidebar_and_stack() {
        let areas = pane_areas(Rect::new(0, 0, 100, 40), 3, 30);
        assert_eq!(areas.len(), 3);
        assert_eq!(areas[0], Rect::new(0, 0, 30, 40));
        assert_eq!(areas[1], Rect::new(30, 0, 70, 20));
        assert_eq!(areas[2], Rect::new(30, 20, 70, 20));
    }

    #[test]
    fn test_two_panes_side_by_side() {
        let areas = pane_areas(Rect::new(0, 0, 100, 40), 2, 30);
        assert_eq!(areas[0].width, 30);
        assert_eq!(areas[1], Rect::new(30, 0, 70, 40));
    }

    #[test]
    fn test_single_pane_fills_area() {
        let area = Rect::new(2, 3, 50, 10);
        assert_eq!(pane_areas(area, 1, 30), vec![area]);
        assert!(pane_areas(area, 0, 30).is_empty());
    }

    #[test]
    fn test_sidebar_shrinks_on_narrow_screens() {
        let areas = pane_areas(Rect::new(0, 0, 30, 10), 2, 40);
        assert_eq!(areas[0].width, 20);
        assert_eq!(areas[1].width, 10);
    }
}
