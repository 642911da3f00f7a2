//! Interactive review driver.
//!
//! A line-command loop over [`ReviewSession`], preserving the workflow
//! state machine: candidates toggle between viewing and editing, deletes
//! shrink the working set, confirm is refused on an empty set, and a
//! failed commit keeps everything in place for retry.

use std::io::{BufRead, Write};

use anyhow::Result;
use uuid::Uuid;

use classport::schedule::{decode_day_token, ParsedClass, Term, Weekday};
use classport::{CalendarSync, CandidateMode, ReviewSession, WorkflowError};

const HELP: &str = "\
Commands:
  l                 list candidates
  e <n>             open/close candidate n for editing
  set <n> <f> <v>   set field f (code name instructor location notes credits
                    start end term color) of candidate n; '-' clears
  day <n> <tok>     toggle a day (M T W Th F) on candidate n
  d <n>             delete candidate n
  add               add the remaining class(es) to the calendar
  q                 cancel and discard all candidates
  h                 this help";

pub async fn run<S: CalendarSync>(session: &mut ReviewSession, sync: &S) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    print_candidates(session);
    println!("(h for help)");

    loop {
        print!("review> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // stdin closed: same as cancel, discard everything
            session.cancel();
            println!("\nCancelled; no classes were added.");
            return Ok(());
        };
        let line = line?;
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        match command {
            "" | "l" | "list" => print_candidates(session),
            "h" | "help" => println!("{HELP}"),
            "e" => with_candidate(session, &args, |session, id| {
                match session.toggle_edit(id) {
                    Ok(CandidateMode::Editing) => println!("editing; use `set` and `day`"),
                    Ok(CandidateMode::Viewing) => println!("back to viewing"),
                    Err(e) => println!("⚠️  {e}"),
                }
            }),
            "set" => cmd_set(session, &args),
            "day" => cmd_day(session, &args),
            "d" | "delete" => with_candidate(session, &args, |session, id| {
                match session.delete(id) {
                    Ok(class) => println!("deleted {}", class.course_code),
                    Err(e) => println!("⚠️  {e}"),
                }
                print_candidates(session);
            }),
            "add" | "confirm" => {
                if !session.can_confirm() {
                    println!("⚠️  nothing to add; the candidate set is empty");
                    continue;
                }
                let count = session.len();
                match session.confirm(sync).await {
                    Ok(added) => {
                        println!("✅ Added {added} class(es)");
                        return Ok(());
                    }
                    Err(e) => {
                        // Set preserved; the user can fix and retry.
                        debug_assert_eq!(session.len(), count);
                        println!("❌ {e}");
                        println!("   Your {count} candidate(s) are still here; retry with `add`.");
                    }
                }
            }
            "q" | "quit" | "cancel" => {
                session.cancel();
                println!("Cancelled; no classes were added.");
                return Ok(());
            }
            other => println!("⚠️  unknown command `{other}` (h for help)"),
        }
    }
}

/// Resolve a 1-based candidate index argument and run `f` on it.
fn with_candidate<F>(session: &mut ReviewSession, args: &[&str], f: F)
where
    F: FnOnce(&mut ReviewSession, Uuid),
{
    match args.first().and_then(|a| a.parse::<usize>().ok()) {
        Some(n) if n >= 1 && n <= session.len() => {
            let id = session.candidates()[n - 1].class.id;
            f(session, id);
        }
        _ => println!("⚠️  expected a candidate number 1-{}", session.len()),
    }
}

fn cmd_set(session: &mut ReviewSession, args: &[&str]) {
    if args.len() < 3 {
        println!("⚠️  usage: set <n> <field> <value>");
        return;
    }
    let field = args[1].to_ascii_lowercase();
    let value = args[2..].join(" ");
    let value = value.trim().to_string();
    let clear = value == "-";

    with_candidate(session, args, |session, id| {
        let result = session.edit(id, |class| apply_set(class, &field, &value, clear));
        match result {
            Ok(()) => print_candidates(session),
            Err(WorkflowError::NotEditing(_)) => {
                println!("⚠️  open the candidate for editing first (e <n>)");
            }
            Err(e) => println!("⚠️  {e}"),
        }
    });
}

fn apply_set(class: &mut ParsedClass, field: &str, value: &str, clear: bool) {
    let opt = || if clear { None } else { Some(value.to_string()) };
    match field {
        "code" => {
            if !clear && !value.is_empty() {
                class.course_code = value.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
            } else {
                println!("⚠️  the course code cannot be empty");
            }
        }
        "name" => class.course_name = if clear { String::new() } else { value.to_string() },
        "instructor" => class.instructor = opt(),
        "location" => class.location = opt(),
        "notes" => class.notes = opt(),
        "color" => class.color = opt(),
        "credits" => {
            class.credits = if clear { None } else { value.parse().ok() };
        }
        "start" | "end" => {
            let time = if clear { None } else { ParsedClass::parse_display_time(value) };
            if !clear && time.is_none() {
                println!("⚠️  could not read `{value}` as a time (try 9:30AM or 14:00)");
                return;
            }
            if field == "start" {
                class.start_time = time;
            } else {
                class.end_time = time;
            }
        }
        "term" => {
            class.term = if clear { None } else { parse_term(value) };
            if !clear && class.term.is_none() {
                println!("⚠️  could not read `{value}` as a term (try `Fall 2026`)");
            }
        }
        other => println!("⚠️  unknown field `{other}`"),
    }
}

fn parse_term(value: &str) -> Option<Term> {
    let mut parts = value.split_whitespace();
    let season = parts.next()?.parse().ok()?;
    let year = parts.next()?.parse().ok()?;
    Some(Term { season, year })
}

fn cmd_day(session: &mut ReviewSession, args: &[&str]) {
    let Some(day) = args.get(1).and_then(|tok| single_day(tok)) else {
        println!("⚠️  usage: day <n> <M|T|W|Th|F>");
        return;
    };
    with_candidate(session, args, |session, id| match session.toggle_day(id, day) {
        Ok(true) => println!("added {}", day.name()),
        Ok(false) => println!("removed {}", day.name()),
        Err(WorkflowError::NotEditing(_)) => {
            println!("⚠️  open the candidate for editing first (e <n>)");
        }
        Err(e) => println!("⚠️  {e}"),
    });
}

fn single_day(token: &str) -> Option<Weekday> {
    let days = decode_day_token(token)?;
    if days.len() == 1 {
        days.into_iter().next()
    } else {
        None
    }
}

pub fn print_candidates(session: &ReviewSession) {
    if session.is_empty() {
        println!("No candidates left.");
        return;
    }
    println!("{} candidate class(es):", session.len());
    for (i, candidate) in session.candidates().iter().enumerate() {
        let class = &candidate.class;
        let mode = match candidate.mode {
            CandidateMode::Editing => " [editing]",
            CandidateMode::Viewing => "",
        };
        let mut line = format!("  {}. {}", i + 1, class.course_code);
        if !class.course_name.is_empty() {
            line.push_str(&format!(" — {}", class.course_name));
        }
        println!("{line}{mode}");

        let mut detail = Vec::new();
        if !class.days.is_empty() {
            detail.push(class.day_code());
        }
        let times = class.display_time_range();
        if !times.is_empty() {
            detail.push(times);
        }
        if let Some(loc) = &class.location {
            detail.push(loc.clone());
        }
        if let Some(instructor) = &class.instructor {
            detail.push(instructor.clone());
        }
        if let Some(credits) = class.credits {
            detail.push(format!("{credits} cr"));
        }
        if let Some(term) = class.term {
            detail.push(term.to_string());
        }
        if !detail.is_empty() {
            println!("     {}", detail.join(" · "));
        }
        if class.times_inverted() {
            println!("     ⚠️  start time is not before end time — please correct");
        }
    }
}
