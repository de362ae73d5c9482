//! Pure focus arithmetic over a [`Registry`].
//!
//! Every step is taken over the owning view's own pane sequence, so wraparound
//! never depends on how many panes other views declare. A `None` result means
//! the input pair is not part of the registry.

use super::registry::{PaneId, Registry, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

fn cycle(len: usize, position: usize, step: Step) -> usize {
    match step {
        Step::Forward => (position + 1) % len,
        Step::Backward => (position + len - 1) % len,
    }
}

fn step_pane(registry: &Registry, view: View, pane: PaneId, step: Step) -> Option<PaneId> {
    let panes = registry.panes(view);
    let position = panes.iter().position(|p| *p == pane)?;
    Some(panes[cycle(panes.len(), position, step)])
}

fn step_view(registry: &Registry, view: View, step: Step) -> Option<View> {
    let position = registry.view_position(view)?;
    Some(registry.view_at(cycle(registry.view_count(), position, step)))
}

pub fn next_pane(registry: &Registry, view: View, pane: PaneId) -> Option<PaneId> {
    step_pane(registry, view, pane, Step::Forward)
}

pub fn prev_pane(registry: &Registry, view: View, pane: PaneId) -> Option<PaneId> {
    step_pane(registry, view, pane, Step::Backward)
}

/// The view after `view`. Which pane gets focus there is up to the caller.
pub fn next_view(registry: &Registry, view: View) -> Option<View> {
    step_view(registry, view, Step::Forward)
}

pub fn prev_view(registry: &Registry, view: View) -> Option<View> {
    step_view(registry, view, Step::Backward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::registry::Focus;

    fn all_targets(registry: &Registry) -> Vec<Focus> {
        registry.targets().collect()
    }

    #[test]
    fn test_next_pane_within_view() {
        let registry = Registry::standard().unwrap();
        assert_eq!(
            next_pane(&registry, View::Client, PaneId::Requests),
            Some(PaneId::Editor)
        );
        assert_eq!(
            next_pane(&registry, View::Environment, PaneId::Environments),
            Some(PaneId::EnvEditor)
        );
    }

    #[test]
    fn test_next_pane_wraps() {
        let registry = Registry::standard().unwrap();
        assert_eq!(
            next_pane(&registry, View::Client, PaneId::Response),
            Some(PaneId::Requests)
        );
        assert_eq!(
            next_pane(&registry, View::Environment, PaneId::EnvEditor),
            Some(PaneId::Environments)
        );
    }

    #[test]
    fn test_prev_pane_wraps() {
        let registry = Registry::standard().unwrap();
        assert_eq!(
            prev_pane(&registry, View::Client, PaneId::Requests),
            Some(PaneId::Response)
        );
        assert_eq!(
            prev_pane(&registry, View::Client, PaneId::Editor),
            Some(PaneId::Requests)
        );
        assert_eq!(
            prev_pane(&registry, View::Environment, PaneId::Environments),
            Some(PaneId::EnvEditor)
        );
        assert_eq!(
            prev_pane(&registry, View::Environment, PaneId::EnvEditor),
            Some(PaneId::Environments)
        );
    }

    #[test]
    fn test_pane_from_other_view_is_rejected() {
        let registry = Registry::standard().unwrap();
        assert_eq!(next_pane(&registry, View::Client, PaneId::EnvEditor), None);
        assert_eq!(prev_pane(&registry, View::Environment, PaneId::Requests), None);
    }

    #[test]
    fn test_navigation_is_its_own_inverse() {
        let registry = Registry::standard().unwrap();
        for focus in all_targets(&registry) {
            let next = next_pane(&registry, focus.view, focus.pane).unwrap();
            assert_eq!(prev_pane(&registry, focus.view, next), Some(focus.pane));
            let prev = prev_pane(&registry, focus.view, focus.pane).unwrap();
            assert_eq!(next_pane(&registry, focus.view, prev), Some(focus.pane));
        }
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let registry = Registry::standard().unwrap();
        for focus in all_targets(&registry) {
            let len = registry.panes(focus.view).len();

            let mut pane = focus.pane;
            for _ in 0..len {
                pane = next_pane(&registry, focus.view, pane).unwrap();
            }
            assert_eq!(pane, focus.pane);

            let mut pane = focus.pane;
            for _ in 0..len {
                pane = prev_pane(&registry, focus.view, pane).unwrap();
            }
            assert_eq!(pane, focus.pane);
        }
    }

    #[test]
    fn test_wraparound_ignores_other_views_pane_counts() {
        // Environment declared first with fewer panes than Client.
        let registry = Registry::new(vec![
            (View::Environment, vec![PaneId::EnvEditor, PaneId::Environments]),
            (
                View::Client,
                vec![PaneId::Response, PaneId::Requests, PaneId::Editor],
            ),
        ])
        .unwrap();
        assert_eq!(
            next_pane(&registry, View::Client, PaneId::Editor),
            Some(PaneId::Response)
        );
        assert_eq!(
            prev_pane(&registry, View::Client, PaneId::Response),
            Some(PaneId::Editor)
        );
        assert_eq!(
            next_pane(&registry, View::Environment, PaneId::Environments),
            Some(PaneId::EnvEditor)
        );
    }

    #[test]
    fn test_single_pane_view_cycles_to_itself() {
        let registry = Registry::new(vec![(View::Client, vec![PaneId::Editor])]).unwrap();
        assert_eq!(
            next_pane(&registry, View::Client, PaneId::Editor),
            Some(PaneId::Editor)
        );
        assert_eq!(
            prev_pane(&registry, View::Client, PaneId::Editor),
            Some(PaneId::Editor)
        );
    }

    #[test]
    fn test_view_cycle() {
        let registry = Registry::standard().unwrap();
        assert_eq!(next_view(&registry, View::Client), Some(View::Environment));
        assert_eq!(next_view(&registry, View::Environment), Some(View::Client));
        assert_eq!(prev_view(&registry, View::Client), Some(View::Environment));
        assert_eq!(prev_view(&registry, View::Environment), Some(View::Client));
    }

    #[test]
    fn test_view_navigation_inverse_and_closure() {
        let registry = Registry::standard().unwrap();
        for view in registry.views() {
            let next = next_view(&registry, view).unwrap();
            assert_eq!(prev_view(&registry, next), Some(view));

            let mut current = view;
            for _ in 0..registry.view_count() {
                current = next_view(&registry, current).unwrap();
            }
            assert_eq!(current, view);
        }
    }

    #[test]
    fn test_unregistered_view_is_rejected() {
        let registry = Registry::new(vec![(View::Client, vec![PaneId::Requests])]).unwrap();
        assert_eq!(next_view(&registry, View::Environment), None);
        assert_eq!(prev_view(&registry, View::Environment), None);
        assert_eq!(next_view(&registry, View::Client), Some(View::Client));
    }
}
