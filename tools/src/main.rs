//! plan-runner: headless staffing planner.
//!
//! Usage:
//!   plan-runner --data-dir ./data --db plan.db --date 2025-03-03
//!   plan-runner --date 2025-03-03 --resolve "jon smith" --assign forklift_driver

mod sources;

use anyhow::Result;
use chrono::NaiveDate;
use sources::{import_employees, FileForecastSource};
use staffing_core::{
    config::PlannerConfig,
    directory::EmployeeDirectory,
    fuzzy::resolve_name,
    notify::LogNotifier,
    planner::{OverrideOutcome, Planner, ScheduleRun},
    store::PlanStore,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let forecast_dir = arg_value(&args, "--forecast-dir")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{data_dir}/forecast"));
    let employees_file = arg_value(&args, "--employees")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{data_dir}/employees/employees.json"));
    let base_date = match arg_value(&args, "--date") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => chrono::Local::now().date_naive(),
    };
    let run_id = arg_value(&args, "--run-id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("run-{}", uuid::Uuid::new_v4()));
    let resolve = arg_value(&args, "--resolve");
    let assign_role = arg_value(&args, "--assign");

    println!("Warehouse staffing: plan-runner");
    println!("  run_id:    {run_id}");
    println!("  base date: {base_date}");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!();

    let config = PlannerConfig::load(data_dir)?;
    let store = PlanStore::open(db)?;
    store.migrate()?;
    if Path::new(&employees_file).exists() {
        import_employees(&store, Path::new(&employees_file))?;
    }
    if store.run_exists(&run_id)? {
        anyhow::bail!("run '{run_id}' already exists in {db}; pass a different --run-id");
    }
    store.insert_run(&run_id, base_date, env!("CARGO_PKG_VERSION"))?;

    let forecasts = FileForecastSource::new(&forecast_dir);
    let notifier = LogNotifier;
    let mut planner = Planner::new(run_id.clone(), &config, &forecasts, &store, &notifier);

    match planner.run(base_date) {
        Some(mut run) => {
            if let Some(name) = resolve {
                let candidates: Vec<String> =
                    store.list_employees()?.into_iter().map(|r| r.id).collect();
                match assign_role {
                    Some(role) => {
                        let outcome = planner.apply_override(&mut run, role, name, &candidates);
                        print_override(name, &outcome);
                    }
                    None => match resolve_name(name, &candidates, &store) {
                        Some(id) => println!("'{name}' resolves to {id}"),
                        None => println!("'{name}' matches no employee"),
                    },
                }
            }
            store.save_schedule(&run)?;
            print_summary(&run);
        }
        None => println!("No schedule produced (forecast unavailable)."),
    }

    store.append_events(&run_id, planner.events())?;
    Ok(())
}

fn print_override(name: &str, outcome: &OverrideOutcome) {
    match outcome {
        OverrideOutcome::Assigned { employee_id, role } => {
            println!("override: '{name}' -> {employee_id} booked as {role}")
        }
        OverrideOutcome::AlreadyAssigned { employee_id, role } => {
            println!("override: '{name}' -> {employee_id} already booked as {role}")
        }
        OverrideOutcome::NoMatch => println!("override: '{name}' matches no employee"),
    }
}

fn print_summary(run: &ScheduleRun) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:    {}", run.run_id);
    for day in [&run.tomorrow, &run.day_after] {
        let f = &day.summary.forecast;
        println!();
        println!("  {} {}", day.summary.day.day_name, day.summary.day.iso_date());
        println!(
            "    incoming {} | shipping {} | cases {} | staged {}",
            f.incoming_pallets, f.shipping_pallets, f.order_qty, f.staged_pallets
        );
        for (role, required) in day.flat_requirements.iter() {
            let assigned = day.allocation.assigned_count(role);
            println!("    {role:<16} required {required:>3}  assigned {assigned:>3}");
        }
    }

    println!();
    if run.shortages.is_empty() {
        println!("=== NO SHORTAGES ===");
    } else {
        println!("=== SHORTAGES ({}) ===", run.tomorrow.summary.day.iso_date());
        for (role, gap) in &run.shortages {
            println!("  {role:<16} short {gap}");
        }
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
