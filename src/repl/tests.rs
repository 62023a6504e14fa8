use super::*;
use crate::config::HistoryConfig;
use crate::parser::{AdminCommand, Command};

fn history_config(dir: &std::path::Path, persist: bool) -> HistoryConfig {
    HistoryConfig {
        max_size: 50,
        file_path: dir.join("nested").join("history.txt"),
        persist,
    }
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("searchsh-repl-{}-{}", name, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_engine_parses_input() {
    let dir = temp_dir("parse");
    let mut engine =
        ReplEngine::new(SharedState::new(None), &history_config(&dir, false), true, None).unwrap();

    assert!(engine.is_running());
    assert!(matches!(
        engine.process_input("use logs").unwrap(),
        Command::Admin(AdminCommand::UseIndex(ref name)) if name == "logs"
    ));
    assert!(engine.process_input("frobnicate").is_err());
}

#[test]
fn test_engine_creates_history_directory() {
    let dir = temp_dir("history");
    let config = history_config(&dir, true);
    ReplEngine::new(SharedState::new(None), &config, false, None).unwrap();
    assert!(config.file_path.parent().unwrap().is_dir());
}

#[test]
fn test_engine_shares_state_with_prompt() {
    let dir = temp_dir("state");
    let state = SharedState::new(None);
    let engine = ReplEngine::new(state.clone(), &history_config(&dir, false), true, None).unwrap();

    state.set_index("metrics");
    assert_eq!(engine.shared_state().get_index().as_deref(), Some("metrics"));
}
