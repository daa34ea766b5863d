//! Line-driven front end for the headless binary.
//!
//! Each stdin line is one user action. Location searches and attack
//! resolution run as async tasks; their results are marshalled onto the
//! frame loop as commands, never applied directly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use warglobe_core::commands::WorldCommand;
use warglobe_core::constants::SEARCH_DEBOUNCE_MS;
use warglobe_core::error::WarRoomError;

use crate::search::{SearchOutcome, SearchSession};
use crate::services::{AttackCommandResolver, LocationResolver};
use crate::state::LoopHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum SpeedChange {
    Up,
    Down,
    Set(f64),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum InputLine {
    City(String),
    Attack(String),
    Speed(SpeedChange),
    Rotate(bool),
    Quit,
}

pub const USAGE: &str = "commands:
  city <query>          search a place and add it to the journey
  attack <text>         e.g. \"france attacks germany and spain\"
  speed up|down|<x>     change travel speed
  rotate on|off         toggle ambient globe rotation
  quit";

/// Parse a line. `None` for blank or unrecognised input.
pub fn parse_line(line: &str) -> Option<InputLine> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match (verb.to_ascii_lowercase().as_str(), rest) {
        ("city", query) if !query.is_empty() => Some(InputLine::City(query.to_string())),
        ("attack", text) if !text.is_empty() => Some(InputLine::Attack(text.to_string())),
        ("speed", "up") => Some(InputLine::Speed(SpeedChange::Up)),
        ("speed", "down") => Some(InputLine::Speed(SpeedChange::Down)),
        ("speed", value) => value.parse().ok().map(|x| InputLine::Speed(SpeedChange::Set(x))),
        ("rotate", "on") => Some(InputLine::Rotate(true)),
        ("rotate", "off") => Some(InputLine::Rotate(false)),
        ("quit" | "exit", "") => Some(InputLine::Quit),
        _ => None,
    }
}

/// Run a debounced search for `query` and turn the first result into a
/// waypoint. Returns `None` when a newer search superseded this one.
pub async fn search_city(
    session: &Mutex<SearchSession>,
    locations: &dyn LocationResolver,
    query: &str,
    started: Instant,
) -> Option<WorldCommand> {
    let elapsed_ms = |at: Instant| at.duration_since(started).as_secs_f64() * 1000.0;

    lock(session)?.on_input(query, elapsed_ms(Instant::now()));
    tokio::time::sleep(Duration::from_secs_f64(SEARCH_DEBOUNCE_MS / 1000.0)).await;
    let request = lock(session)?.poll(elapsed_ms(Instant::now()))?;

    let result = locations.search(&request.query).await;
    let outcome = lock(session)?.complete(request.generation, result);

    match outcome {
        SearchOutcome::Stale => None,
        SearchOutcome::Failed(error) => Some(WorldCommand::ReportFailure { error }),
        SearchOutcome::Suggestions(candidates) => {
            let city = candidates.into_iter().next()?;
            Some(WorldCommand::AddWaypoint {
                label: city.label,
                lat: city.lat,
                lon: city.lon,
                country: Some(city.country).filter(|c| !c.is_empty()),
            })
        }
    }
}

fn lock(session: &Mutex<SearchSession>) -> Option<std::sync::MutexGuard<'_, SearchSession>> {
    session.lock().ok()
}

/// Resolve free text into engine commands: one failure report per invalid
/// entry, then the valid orders as a single batch. A service failure is a
/// single report and nothing else.
pub async fn resolve_attack(attacks: &dyn AttackCommandResolver, text: &str) -> Vec<WorldCommand> {
    match attacks.resolve(text).await {
        Ok(parsed) => {
            let mut commands: Vec<WorldCommand> = parsed
                .invalid
                .into_iter()
                .map(|error| WorldCommand::ReportFailure { error })
                .collect();
            if !parsed.orders.is_empty() {
                commands.push(WorldCommand::LaunchAttacks {
                    orders: parsed.orders,
                });
            }
            commands
        }
        Err(error) => vec![WorldCommand::ReportFailure { error }],
    }
}

/// Dispatches input lines. Must be created inside a tokio runtime.
pub struct Runner {
    handle: LoopHandle,
    locations: Arc<dyn LocationResolver>,
    attack_tx: mpsc::UnboundedSender<String>,
    session: Arc<Mutex<SearchSession>>,
    started: Instant,
}

impl Runner {
    pub fn new(
        handle: LoopHandle,
        locations: Arc<dyn LocationResolver>,
        attacks: Arc<dyn AttackCommandResolver>,
    ) -> Self {
        let (attack_tx, attack_rx) = mpsc::unbounded_channel();
        tokio::spawn(attack_worker(attack_rx, attacks, handle.clone()));
        Self {
            handle,
            locations,
            attack_tx,
            session: Arc::new(Mutex::new(SearchSession::new())),
            started: Instant::now(),
        }
    }

    /// Handle one line. Returns false on quit.
    pub fn handle_line(&self, line: &str) -> bool {
        let Some(input) = parse_line(line) else {
            if !line.trim().is_empty() {
                eprintln!("{USAGE}");
            }
            return true;
        };

        match input {
            InputLine::City(query) => self.spawn_search(query),
            InputLine::Attack(text) => {
                self.handle.send(WorldCommand::ReportInfo {
                    message: "Resolving attack command...".to_string(),
                });
                if self.attack_tx.send(text).is_err() {
                    self.handle.send(WorldCommand::ReportFailure {
                        error: WarRoomError::service("attack resolver stopped"),
                    });
                }
            }
            InputLine::Speed(SpeedChange::Up) => {
                self.handle.send(WorldCommand::SpeedUp);
            }
            InputLine::Speed(SpeedChange::Down) => {
                self.handle.send(WorldCommand::SpeedDown);
            }
            InputLine::Speed(SpeedChange::Set(multiplier)) => {
                self.handle.send(WorldCommand::SetSpeed { multiplier });
            }
            InputLine::Rotate(enabled) => {
                self.handle.send(WorldCommand::SetAmbientRotation { enabled });
            }
            InputLine::Quit => return false,
        }
        true
    }

    fn spawn_search(&self, query: String) {
        let session = Arc::clone(&self.session);
        let locations = Arc::clone(&self.locations);
        let handle = self.handle.clone();
        let started = self.started;
        tokio::spawn(async move {
            let command = search_city(&session, locations.as_ref(), &query, started).await;
            if let Some(command) = command {
                handle.send(command);
            }
        });
    }
}

/// Resolves attack texts one at a time, in arrival order, so status lines
/// follow the order the user typed them.
async fn attack_worker(
    mut rx: mpsc::UnboundedReceiver<String>,
    attacks: Arc<dyn AttackCommandResolver>,
    handle: LoopHandle,
) {
    while let Some(text) = rx.recv().await {
        for command in resolve_attack(attacks.as_ref(), &text).await {
            if !handle.send(command) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use warglobe_core::commands::AttackOrder;
    use warglobe_core::enums::LookupSide;
    use warglobe_core::error::Result;

    use crate::services::{parse_attack_content, LocationCandidate, ParsedAttacks};

    struct FakeLocations {
        delay_ms: u64,
    }

    #[async_trait]
    impl LocationResolver for FakeLocations {
        async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            match query {
                "Paris" => Ok(vec![LocationCandidate::from_display_name(
                    "Paris, Ile-de-France, France",
                    48.85,
                    2.35,
                )]),
                "offline" => Err(WarRoomError::service("Network error")),
                _ => Ok(Vec::new()),
            }
        }
    }

    struct FakeAttacks;

    #[async_trait]
    impl AttackCommandResolver for FakeAttacks {
        async fn resolve(&self, text: &str) -> Result<ParsedAttacks> {
            match text {
                "down" => Err(WarRoomError::service("HTTP 503")),
                other => parse_attack_content(other),
            }
        }
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(parse_line("city New York"), Some(InputLine::City("New York".into())));
        assert_eq!(
            parse_line("  ATTACK france attacks germany "),
            Some(InputLine::Attack("france attacks germany".into()))
        );
        assert_eq!(parse_line("speed up"), Some(InputLine::Speed(SpeedChange::Up)));
        assert_eq!(parse_line("speed 2.5"), Some(InputLine::Speed(SpeedChange::Set(2.5))));
        assert_eq!(parse_line("rotate off"), Some(InputLine::Rotate(false)));
        assert_eq!(parse_line("quit"), Some(InputLine::Quit));
        assert_eq!(parse_line("city"), None);
        assert_eq!(parse_line("speed fast"), None);
        assert_eq!(parse_line("dance"), None);
    }

    #[tokio::test]
    async fn test_search_city_adds_first_candidate() {
        let session = Mutex::new(SearchSession::new());
        let locations = FakeLocations { delay_ms: 0 };
        let command = search_city(&session, &locations, "Paris", Instant::now()).await;
        assert_eq!(
            command,
            Some(WorldCommand::AddWaypoint {
                label: "Paris".into(),
                lat: 48.85,
                lon: 2.35,
                country: Some("France".into()),
            })
        );
    }

    #[tokio::test]
    async fn test_search_city_reports_unknown_place() {
        let session = Mutex::new(SearchSession::new());
        let locations = FakeLocations { delay_ms: 0 };
        let command = search_city(&session, &locations, "Atlantis", Instant::now()).await;
        assert_eq!(
            command,
            Some(WorldCommand::ReportFailure {
                error: WarRoomError::unresolved(LookupSide::Location, "Atlantis")
            })
        );
    }

    #[tokio::test]
    async fn test_search_city_reports_network_error() {
        let session = Mutex::new(SearchSession::new());
        let locations = FakeLocations { delay_ms: 0 };
        let command = search_city(&session, &locations, "offline", Instant::now()).await;
        assert!(matches!(
            command,
            Some(WorldCommand::ReportFailure {
                error: WarRoomError::ServiceFailure { .. }
            })
        ));
    }

    #[tokio::test]
    async fn test_superseded_search_yields_nothing() {
        let session = Mutex::new(SearchSession::new());
        let locations = FakeLocations { delay_ms: 200 };
        let started = Instant::now();

        let first = search_city(&session, &locations, "Paris", started);
        let second = async {
            tokio::time::sleep(Duration::from_millis(400)).await;
            search_city(&session, &locations, "Atlantis", started).await
        };
        let (first, second) = tokio::join!(first, second);

        // The first request was still in flight when the second input
        // arrived, so its results are discarded.
        assert_eq!(first, None);
        assert!(matches!(second, Some(WorldCommand::ReportFailure { .. })));
    }

    #[tokio::test]
    async fn test_resolve_attack_partial_batch() {
        let commands = resolve_attack(
            &FakeAttacks,
            r#"[{"attacker":"France","target":"Germany"},{"target":"Spain"}]"#,
        )
        .await;
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], WorldCommand::ReportFailure { .. }));
        assert_eq!(
            commands[1],
            WorldCommand::LaunchAttacks {
                orders: vec![AttackOrder::new("France", "Germany")]
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_attack_service_failure_is_single_report() {
        let commands = resolve_attack(&FakeAttacks, "down").await;
        assert_eq!(commands.len(), 1);
        assert!(matches!(
            commands[0],
            WorldCommand::ReportFailure {
                error: WarRoomError::ServiceFailure { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_attack_invalid_command() {
        let commands = resolve_attack(&FakeAttacks, r#"{"error":"Invalid command"}"#).await;
        assert_eq!(
            commands,
            vec![WorldCommand::ReportFailure {
                error: WarRoomError::invalid("Invalid command")
            }]
        );
    }
}
