//! Application core: event loop, press dispatch, status line.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use lgremote_core::{Connector, Remote, WakeService};

use crate::action::{Action, ButtonId};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::pad::RemotePad;
use crate::theme;
use crate::tui::Tui;

/// Outcome of the most recent press, shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Status {
    #[default]
    Ready,
    Sent(&'static str),
    Failed(String),
}

pub struct App<C: Connector, W: WakeService> {
    remote: Remote<C, W>,
    device: String,
    pad: RemotePad,
    status: Status,
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl<C: Connector, W: WakeService> App<C, W> {
    pub fn new(remote: Remote<C, W>, device: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            remote,
            device,
            pad: RemotePad::new(),
            status: Status::default(),
            running: true,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let mut events = EventReader::new(Duration::from_millis(150));
        tui.draw(|frame| self.render(frame))?;

        info!(device = %self.device, size = ?tui.size()?, "remote started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tap(mouse) => {
                    if let Some(action) = self.pad.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                tui.draw(|frame| self.render(frame))?;

                // Show the flash before the round trip; the loop waits on it.
                if let Action::Press(id) = action {
                    self.dispatch(id).await;
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("remote closed");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q') | KeyCode::Esc) => Ok(Some(Action::Quit)),
            _ => self.pad.handle_key_event(key),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        if let Action::Quit = action {
            self.running = false;
        }
        if let Some(follow_up) = self.pad.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Run the pressed button's command. Failures end here: logged once,
    /// shown in the status line, and the button stays live for another try.
    async fn dispatch(&mut self, id: ButtonId) {
        let Some(button) = self.pad.button(id) else {
            return;
        };
        let (label, command) = (button.label, button.command.clone());

        self.status = match self.remote.invoke(&self.device, &command).await {
            Ok(()) => {
                info!(device = %self.device, %command, "sent");
                Status::Sent(label)
            }
            Err(e) => {
                warn!(device = %self.device, %command, error = %e, "command failed");
                Status::Failed(e.to_string())
            }
        };
    }

    fn render(&self, frame: &mut Frame) {
        let [pad_area, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
        self.pad.render(frame, pad_area);
        self.render_status_bar(frame, status_area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let host = self
            .remote
            .settings()
            .get(&self.device)
            .map(|tv| tv.host.as_str())
            .unwrap_or_default();

        let mut spans = vec![
            Span::styled(format!(" {} ", self.device), theme::device_name()),
            Span::styled(format!("{host}  "), theme::key_hint()),
        ];
        match &self.status {
            Status::Ready => {}
            Status::Sent(label) => {
                spans.push(Span::styled(format!("\u{2713} {label}"), theme::status_ok()));
            }
            Status::Failed(reason) => {
                spans.push(Span::styled(format!("\u{2717} {reason}"), theme::status_error()));
            }
        }

        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(8)]).areas(area);
        frame.render_widget(Paragraph::new(Line::from(spans)), left);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("q", theme::key_hint_key()),
                Span::styled(" quit ", theme::key_hint()),
            ])),
            right,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lgremote_api::{Error, MacAddress};
    use lgremote_core::{PointerInput, Session, Settings, TvSettings};
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use serde_json::{Value, json};

    /// Refuses the first connection attempt, accepts the rest.
    #[derive(Default)]
    struct FlakyConnector {
        attempts: AtomicUsize,
    }

    struct QuietSession;

    struct QuietInput;

    struct NoWake;

    impl Connector for FlakyConnector {
        type Session = QuietSession;

        async fn connect(&self, _settings: &TvSettings) -> Result<QuietSession, Error> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(Error::Timeout { timeout_secs: 10 });
            }
            Ok(QuietSession)
        }
    }

    impl Session for QuietSession {
        type Input = QuietInput;

        async fn request(&self, _uri: &str, _payload: Option<Value>) -> Result<Value, Error> {
            Ok(json!({"returnValue": true}))
        }

        async fn connect_input(&self) -> Result<QuietInput, Error> {
            Ok(QuietInput)
        }

        fn client_key(&self) -> Option<&SecretString> {
            None
        }
    }

    impl PointerInput for QuietInput {
        async fn button(&self, _name: &str) -> Result<(), Error> {
            Ok(())
        }
    }

    impl WakeService for NoWake {
        async fn resolve_link_layer_address(&self, host: &str) -> Result<MacAddress, Error> {
            Err(Error::MacUnresolved {
                host: host.to_owned(),
            })
        }

        async fn send_wake_packet(&self, _mac: MacAddress) -> Result<(), Error> {
            Ok(())
        }
    }

    fn app(file: &tempfile::NamedTempFile) -> App<FlakyConnector, NoWake> {
        let settings = Settings::load(file.path()).unwrap();
        let remote = Remote::new(settings, FlakyConnector::default(), NoWake);
        App::new(remote, "living_room".to_owned())
    }

    fn settings_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"living_room:\n  host: 192.168.1.50\n").unwrap();
        file
    }

    fn button_id(app: &App<FlakyConnector, NoWake>, label: &str) -> ButtonId {
        (0..)
            .find(|id| app.pad.button(*id).is_some_and(|b| b.label == label))
            .unwrap()
    }

    #[tokio::test]
    async fn failed_press_is_shown_and_button_stays_usable() {
        let file = settings_file();
        let mut app = app(&file);
        let volume_up = button_id(&app, "Vol +");

        app.dispatch(volume_up).await;
        match &app.status {
            Status::Failed(reason) => assert!(reason.contains("living_room"), "{reason}"),
            other => panic!("expected a failure, got {other:?}"),
        }
        assert!(app.running);

        app.dispatch(volume_up).await;
        assert_eq!(app.status, Status::Sent("Vol +"));
    }

    #[tokio::test]
    async fn failed_power_on_is_shown() {
        let file = settings_file();
        let mut app = app(&file);

        app.dispatch(button_id(&app, "On")).await;
        assert!(matches!(app.status, Status::Failed(_)), "{:?}", app.status);
    }

    #[test]
    fn quit_keys() {
        let file = settings_file();
        let mut app = app(&file);
        for key in [
            KeyEvent::from(KeyCode::Char('q')),
            KeyEvent::from(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(app.handle_key_event(key).unwrap(), Some(Action::Quit));
        }
        app.process_action(&Action::Quit).unwrap();
        assert!(!app.running);
    }
}
