use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

use emote_input::catalog::StaticCatalog;
use emote_input::cli::CliArgs;
use emote_input::editable::ProcessedContent;
use emote_input::event_bus::{callback, topics, EventBus};
use emote_input::platform::ManualPlatform;
use emote_input::script::Script;
use emote_input::Runtime;

/// A bus event seen during the replay
#[derive(Debug, Serialize)]
struct ObservedEvent {
    topic: &'static str,
    data: Value,
}

/// Final state printed after the replay
#[derive(Debug, Serialize)]
struct SessionReport {
    events: Vec<ObservedEvent>,
    content: ProcessedContent,
    draft: String,
    history: Vec<String>,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    emote_input::tracing::init();

    let run = args
        .into_config()
        .context("Failed to load configuration")?;

    let catalog = match &run.emotes {
        Some(path) if path.exists() => StaticCatalog::load(path)
            .with_context(|| format!("Failed to load emotes from {}", path.display()))?,
        Some(path) => {
            tracing::warn!("Emote catalog {} not found, no emotes", path.display());
            StaticCatalog::default()
        }
        None => StaticCatalog::default(),
    };

    let script = Script::load(&run.script)
        .with_context(|| format!("Failed to load script {}", run.script.display()))?;

    let clock = Rc::new(ManualPlatform::new());
    let bus = EventBus::new();
    let events = record_events(&bus)?;

    let mut runtime = Runtime::with_config(
        run.composer,
        Rc::new(catalog),
        Rc::clone(&clock) as Rc<dyn emote_input::platform::Platform>,
        bus,
    );

    script.run(&mut runtime, &clock);
    runtime.flush();

    let composer = runtime.composer();
    let report = SessionReport {
        events: events.take(),
        content: composer.content().clone(),
        draft: composer.draft_text(),
        history: composer.history().iter().map(str::to_string).collect(),
    };
    runtime.teardown();

    if run.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn record_events(bus: &EventBus) -> Result<Rc<RefCell<Vec<ObservedEvent>>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    for topic in [topics::CHARACTER_COUNT, topics::IS_EMPTY, topics::SUBMIT] {
        let events = Rc::clone(&events);
        bus.subscribe(
            topic,
            callback(move |data| {
                events.borrow_mut().push(ObservedEvent {
                    topic,
                    data: data.clone(),
                })
            }),
            false,
            false,
        )
        .with_context(|| format!("Failed to subscribe to {}", topic))?;
    }
    Ok(events)
}

fn print_report(report: &SessionReport) {
    for event in &report.events {
        println!("{} {}", event.topic, event.data);
    }
    println!();
    println!("message:    {}", report.content.message);
    println!("characters: {}", report.content.character_count);
    let ids: Vec<&str> = report.content.token_ids.iter().map(|id| id.as_str()).collect();
    println!("tokens:     [{}]", ids.join(", "));
    println!("draft:      {}", report.draft);
    for (i, entry) in report.history.iter().enumerate() {
        println!("history[{}]: {}", i, entry);
    }
}
