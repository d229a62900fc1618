use std::collections::HashMap;

use solomon::config::SolomonConfig;
use solomon::core::state::AppState;
use solomon::core::task::{Task, TaskId};
use solomon::core::view;
use solomon::sync::Mirror;

/// Wrapper filter: solomon crate at info/debug (per config), everything else at warn.
struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

impl log::Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if metadata.target().starts_with("solomon") || metadata.target().starts_with("state_check") {
            let max = if solomon::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
            metadata.level() <= max
        } else {
            metadata.level() <= log::LevelFilter::Warn
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn init_logging(config: &SolomonConfig) {
    solomon::set_debug_logging(config.debug_logging);
    match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => {
            let journal = journal.with_syslog_identifier("solomon-state-check".to_string());
            if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                // Global max must be Debug so solomon debug logs can pass through when toggled
                log::set_max_level(log::LevelFilter::Debug);
            }
        }
        Err(e) => eprintln!("Journal unavailable, logging disabled: {}", e),
    }
}

fn describe(label: &str, state: &AppState) {
    let counts = view::counts(state);
    println!(
        "{}: {} tasks, {} realms, next id {} (today {}, calendar {})",
        label,
        counts.total,
        state.realms.len(),
        state.counter,
        counts.today,
        counts.calendar
    );
}

fn by_id(state: &AppState) -> HashMap<TaskId, &Task> {
    state.tasks.iter().map(|t| (t.id, t)).collect()
}

#[tokio::main]
async fn main() {
    let config = SolomonConfig::load();
    init_logging(&config);

    println!("=== Local vs Remote State Comparison ===\n");

    let today = solomon::core::today();
    let mirror = Mirror::from_config(&config);
    let local = mirror.local().load(today);
    println!("Local file: {}", mirror.local().path().display());
    describe("Local", &local);

    let Some(remote_client) = mirror.remote() else {
        println!("\nNo remote URL configured.");
        return;
    };
    println!("\n--- Remote: {} ---", remote_client.base_url());

    let remote = match mirror.fetch(today).await {
        Ok(Some(state)) => state,
        Ok(None) => return,
        Err(e) => {
            println!("  Fetch failed: {}", e);
            return;
        }
    };
    describe("Remote", &remote);

    let local_ids = by_id(&local);
    let remote_ids = by_id(&remote);

    let mut local_only: Vec<&Task> = local.tasks.iter().filter(|t| !remote_ids.contains_key(&t.id)).collect();
    let mut remote_only: Vec<&Task> = remote.tasks.iter().filter(|t| !local_ids.contains_key(&t.id)).collect();
    local_only.sort_by_key(|t| t.id);
    remote_only.sort_by_key(|t| t.id);

    let mut changed = Vec::new();
    for task in &local.tasks {
        if let Some(other) = remote_ids.get(&task.id) {
            if *other != task {
                changed.push((task, *other));
            }
        }
    }

    if !changed.is_empty() {
        println!("\n  DIFFERING TASKS ({}):", changed.len());
        for (mine, theirs) in &changed {
            println!(
                "    #{} local: [{}] {} | remote: [{}] {}",
                mine.id,
                mine.column.display_name(),
                mine.title,
                theirs.column.display_name(),
                theirs.title
            );
        }
    }

    if !local_only.is_empty() {
        println!("\n  LOCAL ONLY ({}):", local_only.len());
        for task in &local_only {
            println!("    #{} [{}] {}", task.id, task.column.display_name(), task.title);
        }
    }

    if !remote_only.is_empty() {
        println!("\n  ON SERVER ONLY ({}):", remote_only.len());
        for task in &remote_only {
            println!("    #{} [{}] {}", task.id, task.column.display_name(), task.title);
        }
    }

    let realms_differ = local.realms != remote.realms;
    if realms_differ {
        println!("\n  REALMS DIFFER:");
        println!("    local:  {}", local.realms.keys().cloned().collect::<Vec<_>>().join(", "));
        println!("    remote: {}", remote.realms.keys().cloned().collect::<Vec<_>>().join(", "));
    }

    if changed.is_empty() && local_only.is_empty() && remote_only.is_empty() && !realms_differ {
        println!("  All in sync!");
    }

    println!("\n=== Done ===");
}
