// ==========================================
// Course Planner - command line entry
// ==========================================
// Every command opens the database, runs one API call and prints
// the result as JSON on stdout. Logs go to stderr.
// ==========================================

use anyhow::{bail, Context};
use course_planner::app::{get_default_db_path, AppState};
use course_planner::engine::ScheduleCommand;
use course_planner::repository::CatalogBundle;
use serde::Serialize;

const USAGE: &str = "\
usage:
  course-planner init <db> [name]
  course-planner import <db> <catalog.json>
  course-planner list <db>
  course-planner apply <db> <schedule_id> <revision> <command.json>
  course-planner add-program <db> <schedule_id> <program_id>
  course-planner report <db> <schedule_id> [current_semester_id]
  course-planner db-path";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    course_planner::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    tracing::debug!(version = course_planner::VERSION, ?args, "starting {}", course_planner::APP_NAME);

    match args.as_slice() {
        ["db-path"] => {
            println!("{}", get_default_db_path());
        }
        ["init", db, rest @ ..] if rest.len() <= 1 => {
            let state = AppState::new(db)?;
            let stored = state.planner_api.create_schedule(rest.first().copied()).await?;
            print_json(&stored)?;
        }
        ["import", db, file] => {
            let raw = std::fs::read_to_string(file).with_context(|| format!("cannot read {}", file))?;
            let bundle: CatalogBundle =
                serde_json::from_str(&raw).with_context(|| format!("{} is not a catalog bundle", file))?;
            let state = AppState::new(db)?;
            let summary = state.catalog.import_bundle(&bundle)?;
            print_json(&summary)?;
        }
        ["list", db] => {
            let state = AppState::new(db)?;
            print_json(&state.planner_api.list_schedules()?)?;
        }
        ["apply", db, schedule_id, revision, file] => {
            let revision: i64 = revision
                .parse()
                .with_context(|| format!("revision must be an integer, got '{}'", revision))?;
            let raw = std::fs::read_to_string(file).with_context(|| format!("cannot read {}", file))?;
            let command: ScheduleCommand =
                serde_json::from_str(&raw).with_context(|| format!("{} is not a schedule command", file))?;
            let state = AppState::new(db)?;
            let result = state
                .planner_api
                .apply_command(schedule_id, revision, &command)
                .await?;
            print_json(&result)?;
        }
        ["add-program", db, schedule_id, program_id] => {
            let state = AppState::new(db)?;
            let result = state.planner_api.add_program(schedule_id, program_id).await?;
            print_json(&result)?;
        }
        ["report", db, schedule_id, rest @ ..] if rest.len() <= 1 => {
            let state = AppState::new(db)?;
            let report = state
                .planner_api
                .get_report(schedule_id, rest.first().copied())
                .await?;
            print_json(&report)?;
        }
        _ => {
            eprintln!("{}", USAGE);
            bail!("unrecognized arguments: {:?}", args);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
