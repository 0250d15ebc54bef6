//! sla-runner: headless SLA evaluator over ticket snapshots.
//!
//! Usage:
//!   sla-runner --tickets tickets.json [--data-dir ./data] [--now 2026-05-04T12:00:00Z]
//!   sla-runner --ipc-mode [--data-dir ./data]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use deskops_core::{
    clock::{Clock, EvaluationPass, FixedClock, SystemClock},
    engine::SweepOutcome,
    format::format_time_remaining,
    report::{generate_sla_report, SlaReportSummary},
    sla_config::SlaConfiguration,
    SlaEngine, TicketSnapshot,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Evaluate {
        ticket: TicketSnapshot,
        #[serde(default)]
        config: Option<SlaConfiguration>,
        #[serde(default)]
        now: Option<DateTime<Utc>>,
    },
    Sweep {
        tickets: Vec<TicketSnapshot>,
        #[serde(default)]
        configs: Vec<SlaConfiguration>,
        #[serde(default)]
        now: Option<DateTime<Utc>>,
    },
    Report {
        tickets: Vec<TicketSnapshot>,
    },
    Classify {
        ticket: TicketSnapshot,
    },
    Quit,
}

#[derive(serde::Deserialize)]
struct TicketFile {
    tickets: Vec<TicketSnapshot>,
    #[serde(default)]
    configs: Vec<SlaConfiguration>,
}

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    sweep: &'a SweepOutcome,
    stored_report: SlaReportSummary,
    evaluated_report: SlaReportSummary,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let data_dir = find_arg(&args, "--data-dir").unwrap_or("./data");
    let tickets_path = find_arg(&args, "--tickets");
    let now = match find_arg(&args, "--now") {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("--now is not RFC 3339: {raw}"))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    let engine = SlaEngine::build(data_dir)
        .with_context(|| format!("loading SLA policies from {data_dir}"))?;

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    let Some(tickets_path) = tickets_path else {
        anyhow::bail!("--tickets <file> is required outside --ipc-mode");
    };
    let content = std::fs::read_to_string(tickets_path)
        .with_context(|| format!("cannot read {tickets_path}"))?;
    let file: TicketFile = serde_json::from_str(&content)
        .with_context(|| format!("{tickets_path} is not a ticket file"))?;

    let pass = match now {
        Some(at) => EvaluationPass::begin(&FixedClock::new(at)),
        None => EvaluationPass::begin(&SystemClock),
    };
    let outcome = engine.sweep(&file.tickets, &file.configs, &pass);

    if json_out {
        let summary = RunSummary {
            sweep: &outcome,
            stored_report: generate_sla_report(&file.tickets).summary(),
            evaluated_report: engine.report_at(&file.tickets, &file.configs, pass.now).summary(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&engine, &file, &outcome);
    }
    Ok(())
}

fn run_ipc_loop(engine: &SlaEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    log::info!("ipc mode: reading commands from stdin");

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("rejected ipc line: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        // One instant per request, captured before any calculation.
        let clock_now = |now: Option<DateTime<Utc>>| now.unwrap_or_else(|| SystemClock.now());

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Evaluate { ticket, config, now } => {
                let eval = engine.evaluate(&ticket, config.as_ref(), clock_now(now));
                writeln!(stdout, "{}", serde_json::to_string(&eval)?)?;
            }
            IpcCommand::Sweep { tickets, configs, now } => {
                let pass = EvaluationPass::at(clock_now(now));
                let outcome = engine.sweep(&tickets, &configs, &pass);
                writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?;
            }
            IpcCommand::Report { tickets } => {
                let summary = generate_sla_report(&tickets).summary();
                writeln!(stdout, "{}", serde_json::to_string(&summary)?)?;
            }
            IpcCommand::Classify { ticket } => {
                let reply = serde_json::json!({
                    "ticket_id": ticket.ticket_id,
                    "business_impact": ticket.derived_business_impact(),
                });
                writeln!(stdout, "{reply}")?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(engine: &SlaEngine, file: &TicketFile, outcome: &SweepOutcome) {
    println!("=== SLA SWEEP ===");
    println!("  pass:           {}", outcome.pass_id);
    println!("  evaluated at:   {}", outcome.evaluated_at);
    println!("  policies:       {}", engine.policies().len());
    println!("  tickets:        {}", file.tickets.len());
    println!("  evaluated:      {}", outcome.evaluations.len());
    println!("  skipped (done): {}", outcome.skipped_resolved);
    println!();

    for eval in &outcome.evaluations {
        let escalation = match &eval.escalation {
            Some(d) => format!(" -> L{} {} ({})", d.escalation_level, d.assign_to_role, d.reason),
            None => String::new(),
        };
        println!(
            "  {:<16} {:<9} {:>5.1}% {:>10}{}",
            eval.ticket_id,
            eval.metrics.sla_status.as_str(),
            eval.metrics.percent_time_elapsed,
            format_time_remaining(eval.metrics.time_remaining),
            escalation,
        );
    }

    let report = engine.report_at(&file.tickets, &file.configs, outcome.evaluated_at).summary();
    println!();
    println!("=== COMPLIANCE ===");
    println!("  on track:       {}", report.on_track);
    println!("  at risk:        {}", report.at_risk);
    println!("  breached:       {}", report.breached);
    println!("  compliance:     {}%", report.sla_compliance_rate);
    println!("  avg response:   {}h", report.avg_response_time_hours);
    println!("  avg resolution: {}h", report.avg_resolution_time_hours);
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
