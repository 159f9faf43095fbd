use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use menulens::camera::SimulatedCamera;
use menulens::config::AppConfig;
use menulens::error::OnboardingError;
use menulens::onboarding::StepKind;
use menulens::profile::{Allergen, DietaryRestriction, Goal};
use menulens::scan::{MockClassifier, ScanResult};
use menulens::session::{
    ModalKind, Screen, SessionConfig, SessionController, SessionDeps, SessionUpdate,
};
use menulens::store::{KeyValueStore, LibSqlStore, MemoryStore, PreferenceStore};

const HELP: &str = "\
Commands:
  goal <name>      choose a goal (onboarding step 1)
  toggle <filter>  toggle a dietary restriction or allergen
  next             Next / Get Started
  email <address>  submit your email (last onboarding step)
  scan             scan the menu (camera screen)
  cancel           cancel a running scan
  settings         open settings        travel   open travel mode
  close            close any open modal
  save             save preferences     restart  restart onboarding
  status           show the current screen
  quit";

enum Input {
    Line(Option<String>),
    Update(SessionUpdate),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    eprintln!("🍽  MenuLens v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Onboarding: {:?}", config.onboarding);
    eprintln!("   Camera: {:?}", config.camera);
    eprintln!("   Scan latency: {}ms", config.scan_latency.as_millis());

    // ── Storage ─────────────────────────────────────────────────────────
    let kv: Arc<dyn KeyValueStore> = match LibSqlStore::new_local(&config.db_path).await {
        Ok(store) => {
            eprintln!("   Preferences: {}", config.db_path.display());
            Arc::new(store)
        }
        Err(e) => {
            eprintln!("   Warning: preferences will not persist ({e})");
            Arc::new(MemoryStore::new())
        }
    };
    eprintln!("   Type `help` for commands.\n");

    let deps = SessionDeps {
        preferences: PreferenceStore::new(kv, config.storage_key.clone()),
        camera: Arc::new(SimulatedCamera::new(
            config.camera.clone(),
            config.camera_latency,
        )),
        classifier: Arc::new(MockClassifier::default()),
    };
    let mut session = SessionController::new(SessionConfig::from(&config), deps).await;
    render(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            update = session.next_update() => Input::Update(update),
        };

        match input {
            Input::Line(None) => break,
            Input::Line(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if !handle_command(&mut session, line).await {
                    break;
                }
            }
            Input::Update(update) => render_update(&session, &update),
        }
    }

    session.shutdown();
    Ok(())
}

/// Run one command. Returns `false` to quit.
async fn handle_command(session: &mut SessionController, line: &str) -> bool {
    let (cmd, arg) = match line.split_once(' ') {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };

    match cmd {
        "quit" | "exit" => return false,
        "help" => println!("{HELP}"),
        "status" => render(session),
        "goal" => {
            let error = session_result(session.select_goal_named(arg));
            report(session, error);
        }
        "toggle" => {
            if session.toggle_filter(arg) {
                render_filters(session);
            } else {
                println!("Not a known filter: {arg}");
            }
        }
        "next" => {
            let error = session_result(session.advance());
            report(session, error);
        }
        "email" => {
            let error = session_result(session.submit_email(arg));
            report(session, error);
        }
        "scan" => {
            if !session.start_scan() {
                println!("Can't scan right now.");
            }
            render(session);
        }
        "cancel" => {
            session.cancel_scan();
            render(session);
        }
        "settings" => {
            session.open_modal(ModalKind::Settings);
            render_filters(session);
            println!("Toggle filters, then `save` to apply.");
        }
        "travel" => {
            session.open_modal(ModalKind::TravelMode);
            println!("Travel Mode: get personalized dining recommendations for your destination.");
        }
        "close" => {
            session.close_modal(ModalKind::Settings);
            session.close_modal(ModalKind::TravelMode);
        }
        "save" => {
            let profile = session.profile().clone();
            match session.save_and_close_settings(profile).await {
                Ok(()) => println!("Preferences saved."),
                Err(e) => println!("Couldn't save preferences: {e}"),
            }
        }
        "restart" => {
            session.restart_onboarding();
            render(session);
        }
        other => println!("Unknown command: {other} (try `help`)"),
    }
    true
}

fn session_result<T>(result: Result<T, OnboardingError>) -> Option<String> {
    result.err().map(|e| e.to_string())
}

fn report(session: &SessionController, error: Option<String>) {
    match error {
        Some(message) => println!("{message}"),
        None => render(session),
    }
}

fn render(session: &SessionController) {
    match session.screen() {
        Screen::Onboarding(step) => {
            let onboarding = session.onboarding();
            let kind = onboarding.current();
            println!(
                "\n[{step}/{}] {}\n{}",
                onboarding.total_steps(),
                kind.title(),
                kind.description()
            );
            match kind {
                StepKind::Goal => {
                    let goals: Vec<&str> = Goal::ALL.iter().map(|g| g.label()).collect();
                    println!("Goals: {}", goals.join(", "));
                }
                StepKind::Filters => {
                    let diets: Vec<&str> =
                        DietaryRestriction::ALL.iter().map(|d| d.label()).collect();
                    let allergens: Vec<&str> = Allergen::ALL.iter().map(|a| a.label()).collect();
                    println!("Diets: {}", diets.join(", "));
                    println!("Allergens: {}", allergens.join(", "));
                    render_filters(session);
                }
                _ => {}
            }
            println!("({})", onboarding.primary_label());
        }
        Screen::Camera => {
            if let Some(view) = session.camera_view() {
                println!("\n📷 {}", view.message());
            }
            if let Some(result) = session.scan_result() {
                render_result(result);
            }
        }
    }
}

fn render_filters(session: &SessionController) {
    let profile = session.profile();
    let active: Vec<String> = profile
        .dietary_restrictions
        .iter()
        .map(|d| d.to_string())
        .chain(profile.allergens.iter().map(|a| a.to_string()))
        .collect();
    if active.is_empty() {
        println!("Active filters: none");
    } else {
        println!("Active filters: {}", active.join(", "));
    }
}

fn render_update(session: &SessionController, update: &SessionUpdate) {
    match update {
        SessionUpdate::CameraUnavailable(e) => println!("\n📷 Camera unavailable: {e}"),
        SessionUpdate::Discarded => {}
        SessionUpdate::CameraReady(_) | SessionUpdate::ScanComplete(_) => render(session),
    }
}

fn render_result(result: &ScanResult) {
    println!("\n✅ Safe Options");
    for item in &result.safe_items {
        println!("   • {item}");
    }
    println!("❌ Contains Allergens");
    for item in &result.risky_items {
        println!("   • {item}");
    }
    let detected: Vec<String> = result
        .allergens_detected
        .iter()
        .map(|a| a.to_string())
        .collect();
    println!(
        "⚠️  Allergens Detected: {}",
        if detected.is_empty() {
            "none".to_string()
        } else {
            detected.join(", ")
        }
    );
}
