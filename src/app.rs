use std::io::stdout;
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::event::{AppEvent, DataKind, EventQueue};
use crate::focus::Registry;
use crate::loader::Loader;
use crate::panes::{
    EnvEditor, EnvironmentList, HelpOverlay, NotificationOverlay, Pane, RequestEditor,
    RequestList, ResponseViewer,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One instance per registered pane, wired from the configuration.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let registry = Registry::standard().context("building pane registry")?;
    let keys = config.key_map()?;
    let theme = config.theme();

    let panes: Vec<Box<dyn Pane>> = vec![
        Box::new(RequestList::new(theme)),
        Box::new(RequestEditor::new(theme)),
        Box::new(ResponseViewer::new(theme)),
        Box::new(EnvironmentList::new(theme, config.default_env.clone())),
        Box::new(EnvEditor::new(theme)),
    ];
    let help = HelpOverlay::new(theme, keys.clone(), registry.initial_focus());
    let notifications = NotificationOverlay::new(theme);

    let dispatcher = Dispatcher::new(
        registry,
        keys,
        theme,
        panes,
        Box::new(help),
        Box::new(notifications),
    )
    .context("composing panes")?;
    Ok(dispatcher.with_sidebar_width(config.ui.sidebar_width))
}

pub struct App {
    running: bool,
    dispatcher: Dispatcher,
    queue: EventQueue,
    loader: Loader,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            running: true,
            dispatcher: build_dispatcher(config)?,
            queue: EventQueue::new(),
            loader: Loader::new(config.data_dir.clone()),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.install_panic_hook();
        self.setup_terminal()?;

        let result = self.event_loop().await;

        self.queue.close();
        self.restore_terminal()?;
        result
    }

    fn install_panic_hook(&self) {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            tracing::error!(panic = %panic_info, "panic");
            original_hook(panic_info);
        }));
    }

    fn setup_terminal(&self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        Ok(())
    }

    fn restore_terminal(&self) -> Result<()> {
        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        Ok(())
    }

    fn spawn_interrupt_listener(&self) {
        let tx = self.queue.sender();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(AppEvent::Interrupt);
            }
        });
    }

    /// Queues the initial focus change and the first data loads.
    fn start(&mut self) {
        let follow_ups = self.dispatcher.start();
        self.queue.extend(follow_ups);
        self.queue.push(AppEvent::Reload(DataKind::Requests));
        self.queue.push(AppEvent::Reload(DataKind::Environments));
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        self.spawn_interrupt_listener();
        self.start();

        if let Ok(size) = terminal.size() {
            self.queue.push(AppEvent::Resize {
                width: size.width,
                height: size.height,
            });
        }

        while self.running {
            self.process_pending();
            if !self.running {
                break;
            }

            terminal.draw(|frame| self.dispatcher.render(frame))?;

            if event::poll(POLL_INTERVAL)? {
                if let Some(event) = translate(event::read()?) {
                    self.queue.push(event);
                }
            }
        }

        Ok(())
    }

    /// Handles queued events one at a time, including any follow-ups they
    /// produce, until the queue is empty or a quit is requested.
    fn process_pending(&mut self) {
        while let Some(event) = self.queue.try_next() {
            if let AppEvent::Reload(kind) = event {
                self.loader.reload(kind, self.queue.sender());
            }

            let dispatch = self.dispatcher.dispatch(event);
            self.queue.extend(dispatch.follow_ups);
            if dispatch.quit {
                self.running = false;
                return;
            }
        }
    }
}

/// Terminal input as application events. Ctrl+C arrives as a key in raw mode.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if is_interrupt(&key) {
                Some(AppEvent::Interrupt)
            } else {
                Some(AppEvent::Key(key))
            }
        }
        Event::Resize(width, height) => Some(AppEvent::Resize { width, height }),
        _ => None,
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{request_focus, Focus, PaneId, View};
    use crate::panes::testing::{contains, render_lines};
    use crossterm::event::KeyEventState;
    use std::fs;
    use std::path::PathBuf;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn app(data_dir: PathBuf) -> App {
        let config = Config {
            data_dir,
            ..Config::default()
        };
        App::new(&config).unwrap()
    }

    #[test]
    fn test_translate_input() {
        assert_eq!(
            translate(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppEvent::Interrupt)
        );
        assert_eq!(
            translate(Event::Resize(80, 24)),
            Some(AppEvent::Resize {
                width: 80,
                height: 24
            })
        );
        let release = KeyEvent {
            code: KeyCode::Tab,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate(Event::Key(release)), None);
        assert_eq!(translate(Event::FocusGained), None);
    }

    #[test]
    fn test_build_dispatcher_from_config() {
        let mut config = Config::default();
        config.keys.next_view = Some("ctrl+n".into());
        let dispatcher = build_dispatcher(&config).unwrap();
        assert_eq!(
            dispatcher.active(),
            Focus::new(View::Client, PaneId::Requests)
        );
    }

    #[test]
    fn test_outside_focus_change_leaves_help_alone() {
        let mut dispatcher = build_dispatcher(&Config::default()).unwrap();
        dispatcher.start();
        let before = render_lines(120, 30, |frame| dispatcher.render(frame));
        assert!(contains(&before, "reload"));

        let registry = Registry::standard().unwrap();
        let requests = Focus::new(View::Client, PaneId::Requests);
        let response = Focus::new(View::Client, PaneId::Response);
        let forged = request_focus(&registry, response, requests).unwrap();
        dispatcher.dispatch(AppEvent::FocusChanged(forged));

        assert_eq!(dispatcher.active(), requests);
        let after = render_lines(120, 30, |frame| dispatcher.render(frame));
        assert!(!contains(&after, "scroll"));
        assert_eq!(before, after);
    }

    #[test]
    fn test_build_dispatcher_rejects_bad_keys() {
        let mut config = Config::default();
        config.keys.quit = "nonsense+q".into();
        assert!(build_dispatcher(&config).is_err());
    }

    #[tokio::test]
    async fn test_navigation_and_quit_through_queue() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path().to_path_buf());

        let tab = translate(press(KeyCode::Tab, KeyModifiers::NONE)).unwrap();
        app.queue.push(tab);
        app.process_pending();
        assert!(app.running);
        assert_eq!(
            app.dispatcher.active(),
            Focus::new(View::Client, PaneId::Editor)
        );

        app.queue.push(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL,
        )));
        app.queue.push(AppEvent::Key(KeyEvent::new(
            KeyCode::Tab,
            KeyModifiers::NONE,
        )));
        app.process_pending();
        assert!(!app.running);
        // Nothing after the quit is handled.
        assert_eq!(
            app.dispatcher.active(),
            Focus::new(View::Client, PaneId::Editor)
        );
    }

    #[tokio::test]
    async fn test_reload_posts_loaded_data() {
        let tmp = tempfile::tempdir().unwrap();
        let envs = tmp.path().join("environments");
        fs::create_dir(&envs).unwrap();
        fs::write(envs.join("dev.yaml"), "name: dev\nvariables:\n  host: localhost\n").unwrap();

        let mut app = app(tmp.path().to_path_buf());
        app.start();
        app.process_pending();

        // Loads run in the background and land back on the queue.
        let mut loaded = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if let Some(event) = app.queue.try_next() {
                loaded |= matches!(event, AppEvent::Loaded(_));
                let dispatch = app.dispatcher.dispatch(event);
                app.queue.extend(dispatch.follow_ups);
            }
        }
        assert!(loaded);
        assert!(app.running);
    }
}
