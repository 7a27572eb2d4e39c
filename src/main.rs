use anyhow::{bail, Result};
use rideflow::flows;
use rideflow::renderer::{ConsoleRenderer, StepRenderer};
use rideflow::store::{JsonFileStore, MemoryStore, ProgressStore};
use rideflow::validate::{FormValues, PasswordPolicy};
use rideflow::wizard::{Transition, WizardEngine};
use rideflow::{OtpCode, Role};
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Console demo driver: runs one of the production wizard flows
/// interactively, persisting progress between runs. Quit mid-flow and
/// start again to see resume in action.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rideflow=info".into()),
        )
        .init();

    println!("==========================================");
    println!("  RideFlow - wizard flow demo");
    println!("==========================================");
    println!("Commands while answering: :back, :restart, :quit\n");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut flow_name = "signup".to_string();
    let mut role: Option<Role> = None;
    let mut policy = PasswordPolicy::RELAXED;
    let mut fresh = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--role" => {
                let value = iter.next().map(String::as_str).unwrap_or("");
                role = Some(value.parse().map_err(anyhow::Error::msg)?);
            }
            "--strict" => policy = PasswordPolicy::STRICT,
            "--fresh" => fresh = true,
            name if !name.starts_with('-') => flow_name = name.to_string(),
            other => bail!("unknown option '{other}' (usage: rideflow [signup|reset] [--role ROLE] [--strict] [--fresh])"),
        }
    }

    let definition = match flow_name.as_str() {
        "signup" => flows::signup(policy),
        "reset" => flows::password_reset(),
        other => bail!("unknown flow '{other}', expected 'signup' or 'reset'"),
    };

    let store: Box<dyn ProgressStore> = match JsonFileStore::new() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "No config directory, progress will not survive restarts");
            Box::new(MemoryStore::new())
        }
    };

    let mut engine = WizardEngine::new(definition, store);
    if let Some(role) = role {
        engine = engine.with_role(role);
    }
    if fresh {
        engine.abandon();
    }

    let mut state = engine.start();
    let mut renderer = ConsoleRenderer::new(engine.definition().len());
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    renderer.show_step(state.current_step(), state.direction());
    loop {
        let step = engine
            .definition()
            .step(state.current_step())
            .cloned()
            .expect("current step is always in bounds");
        println!("-- {} --", step.name);

        let mut values = FormValues::new();
        let mut command: Option<String> = None;
        if step.name == "verify" {
            print!("  enter the {}-digit code: ", step.fields.len());
            std::io::stdout().flush()?;
            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            if line.trim().starts_with(':') {
                command = Some(line.trim().to_string());
            } else {
                let mut code = OtpCode::new(step.fields.len());
                code.paste(0, &line);
                values = code.form_values();
            }
        } else {
            for field in &step.fields {
                let current = state.value(&field.id).unwrap_or("");
                if current.is_empty() {
                    print!("  {}: ", field.id);
                } else {
                    print!("  {} [{current}]: ", field.id);
                }
                std::io::stdout().flush()?;
                let line = match lines.next() {
                    Some(line) => line?,
                    None => return Ok(()),
                };
                let answer = line.trim().to_string();
                if answer.starts_with(':') {
                    command = Some(answer);
                    break;
                }
                let answer = if answer.is_empty() {
                    current.to_string()
                } else {
                    answer
                };
                values.insert(field.id.clone(), answer);
            }
        }

        match command.as_deref() {
            Some(":quit") => {
                println!("Progress saved, run again to resume.");
                return Ok(());
            }
            Some(":restart") => {
                engine.abandon();
                state = engine.start();
                renderer.show_step(state.current_step(), state.direction());
                continue;
            }
            Some(":back") => {
                match engine.retreat(&mut state)? {
                    Transition::Moved { step, direction } => renderer.show_step(step, direction),
                    Transition::Blocked { reason } => println!("  ({reason})"),
                    _ => {}
                }
                continue;
            }
            Some(other) => {
                println!("  (unknown command {other})");
                continue;
            }
            None => {}
        }

        match engine.advance(&mut state, &values)? {
            Transition::Moved { step, direction } => {
                renderer.show_step(step, direction);
                if engine.in_flight() {
                    // Simulated mail send with a short artificial delay.
                    println!("  sending reset code...");
                    thread::sleep(Duration::from_millis(400));
                    println!("  your code is {}", flows::issue_reset_code());
                    engine.settle();
                }
            }
            Transition::Completed { redirect } => {
                match redirect {
                    Some(target) => println!("\n✓ All done - redirecting to {target}"),
                    None => println!("\n✓ All done"),
                }
                return Ok(());
            }
            Transition::Rejected(result) => {
                for (field, reason) in result.failures() {
                    renderer.mark_field_invalid(field, *reason);
                }
            }
            Transition::Blocked { reason } => println!("  ({reason})"),
        }
    }

    Ok(())
}
