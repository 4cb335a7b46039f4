// Async REPL implementation using editline with tokio spawn_blocking

use editline::{LineEditor, terminals::StdioTerminal};
use std::io::Write;

use chrono::{DateTime, TimeDelta, Utc};
use relatime_core::{DATETIME_ATTR, Element, Locale, Options, Relatime, SharedPage, moment};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::tokio_scheduler::{Tick, TokioScheduler};

enum CommandOutcome {
    Continue,
    Quit,
}

pub async fn run_repl() -> Result<(), Box<dyn std::error::Error>> {
    // Print ASCII art banner
    println!();
    println!(" ____      _       _   _");
    println!("|  _ \\ ___| | __ _| |_(_)_ __ ___   ___");
    println!("| |_) / _ \\ |/ _` | __| | '_ ` _ \\ / _ \\");
    println!("|  _ <  __/ | (_| | |_| | | | | | |  __/");
    println!("|_| \\_\\___|_|\\__,_|\\__|_|_| |_| |_|\\___| v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Type `help` for the command list, `quit` or Ctrl-D to exit");
    println!("Try `add -5m`, then `show`, then `watch`");
    println!();

    // Engine wired to an in-memory page; refresh ticks arrive over a
    // channel from the tokio timer tasks.
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let page = SharedPage::new();
    let mut engine = Relatime::new();
    engine.set_element_source(Box::new(page.clone()));
    engine.set_scheduler(Box::new(TokioScheduler::new(tick_tx)));

    // Create editline editor and terminal (sync)
    let mut editor = LineEditor::new(1024, 50);
    let mut terminal = StdioTerminal::new();

    loop {
        // Ticks that queued up while the prompt was idle collapse into
        // one refresh pass.
        drain_ticks(&mut tick_rx, &mut engine);

        // Print prompt
        print!("\n> ");
        std::io::stdout().flush()?;

        // Read a line using editline in a blocking task
        let line_result = tokio::task::spawn_blocking(move || {
            let result = editor.read_line(&mut terminal);
            (editor, terminal, result)
        }).await?;

        // Destructure the result
        let (ed, term, read_result) = line_result;
        editor = ed;
        terminal = term;

        match read_result {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match run_command(trimmed, &mut engine, &page, &mut tick_rx).await {
                    CommandOutcome::Continue => {}
                    CommandOutcome::Quit => break,
                }
            }
            Err(editline::Error::Eof) => {
                // EOF (Ctrl-D)
                println!("\nGoodbye!");
                break;
            }
            Err(editline::Error::Interrupted) => {
                // Ctrl-C - just continue
                println!("^C");
                continue;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    engine.stop();
    Ok(())
}

async fn run_command(
    line: &str,
    engine: &mut Relatime,
    page: &SharedPage,
    ticks: &mut UnboundedReceiver<Tick>,
) -> CommandOutcome {
    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let rest = parts.next().map(str::trim).unwrap_or("");

    match command {
        "help" => print_help(),
        "quit" | "exit" => return CommandOutcome::Quit,
        "text" => match parse_instant(rest) {
            Some(instant) => println!("{}", engine.text(instant)),
            None => eprintln!("Usage: text <when>  (e.g. text -5m, text 2013-11-14T13:24:43Z)"),
        },
        "add" => match parse_instant(rest) {
            Some(instant) => {
                let fragment = engine.fragment(instant);
                println!("{}", fragment);
                page.insert(fragment);
            }
            None => eprintln!("Usage: add <when>  (e.g. add -5m, add 2013-11-14T13:24:43Z)"),
        },
        "show" => show_page(page),
        "clear" => {
            page.clear();
            println!("page cleared");
        }
        "locale" => {
            if rest.is_empty() {
                println!("locale: {}", engine.locale());
            } else {
                let active = engine.set_locale(rest);
                if active.code() == rest {
                    println!("locale: {}", active);
                } else {
                    let supported: Vec<&str> =
                        Locale::ALL.iter().map(|locale| locale.code()).collect();
                    eprintln!(
                        "Unsupported locale '{}' (supported: {}), still {}",
                        rest,
                        supported.join(", "),
                        active
                    );
                }
            }
        }
        "tag" => {
            if rest.is_empty() {
                println!("tag: {}", engine.config().tag);
            } else {
                engine.setup(Options {
                    tag: Some(rest.to_string()),
                    ..Options::default()
                });
                println!("tag: {}", engine.config().tag);
            }
        }
        "class" => {
            if rest.is_empty() {
                println!("class: {}", engine.config().class_name);
            } else {
                engine.setup(Options {
                    class_name: Some(rest.to_string()),
                    ..Options::default()
                });
                println!("class: {}", engine.config().class_name);
            }
        }
        "interval" => match rest.parse::<u64>() {
            Ok(secs) => {
                engine.setup(Options {
                    refresh_secs: Some(secs),
                    ..Options::default()
                });
                println!("refresh interval: {:?}", engine.config().refresh);
            }
            Err(_) => eprintln!("Usage: interval <seconds>"),
        },
        "autostart" => match rest {
            "on" => {
                engine.setup(Options {
                    autostart: Some(true),
                    ..Options::default()
                });
                println!("autostart: on");
            }
            "off" => {
                engine.setup(Options {
                    autostart: Some(false),
                    ..Options::default()
                });
                println!("autostart: off");
            }
            _ => eprintln!("Usage: autostart on|off"),
        },
        "start" => {
            engine.start();
            println!("auto-update: {}", if engine.started() { "running" } else { "off" });
        }
        "stop" => {
            engine.stop();
            println!("auto-update: off");
        }
        "started" => {
            println!("{}", engine.started());
        }
        "refresh" => {
            let updated = engine.refresh();
            println!("updated {} element(s)", updated);
        }
        "watch" => watch(engine, page, ticks).await,
        _ => {
            eprintln!("Unknown command: {} (try `help`)", command);
        }
    }

    CommandOutcome::Continue
}

/// Live display mode: keep showing the page, refreshing on every timer
/// tick, until Ctrl-C.
async fn watch(engine: &mut Relatime, page: &SharedPage, ticks: &mut UnboundedReceiver<Tick>) {
    if !engine.started() {
        engine.start();
    }
    println!("Watching, Ctrl-C returns to the prompt");
    show_page(page);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            tick = ticks.recv() => {
                if tick.is_none() {
                    break;
                }
                engine.refresh();
                show_page(page);
            }
        }
    }
}

fn drain_ticks(ticks: &mut UnboundedReceiver<Tick>, engine: &mut Relatime) {
    let mut fired = false;
    while ticks.try_recv().is_ok() {
        fired = true;
    }
    if fired {
        engine.refresh();
    }
}

fn show_page(page: &SharedPage) {
    let elements = page.snapshot();
    if elements.is_empty() {
        println!("(page is empty, try `add -5m`)");
        return;
    }
    for (i, element) in elements.iter().enumerate() {
        let kind = if element.class_name().is_some() { "live" } else { "static" };
        let datetime = element
            .attribute(DATETIME_ATTR)
            .map(|value| format!("  datetime={}", value))
            .unwrap_or_default();
        println!(
            "  [{}] {:<6} <{}> {:<16}{}",
            i,
            kind,
            element.tag(),
            element.text(),
            datetime
        );
    }
}

/// An instant from user input: `now`, a relative offset like `-5m` or
/// `+1h`, or an absolute timestamp.
fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    if input.is_empty() {
        return None;
    }
    if input.eq_ignore_ascii_case("now") {
        return Some(Utc::now());
    }
    if let Some(delta) = parse_offset(input) {
        // Offsets large enough to leave the representable date range are
        // rejected like any other unusable input.
        return Utc::now().checked_add_signed(delta);
    }
    moment::parse(input)
}

/// Offsets are a sign, a number and a unit: `-90s`, `-5m`, `-3h`, `+2d`.
fn parse_offset(input: &str) -> Option<TimeDelta> {
    let (sign, rest) = match input.as_bytes().first()? {
        b'-' => (-1i64, &input[1..]),
        b'+' => (1i64, &input[1..]),
        _ => return None,
    };
    let unit = rest.chars().last()?;
    let digits = &rest[..rest.len() - unit.len_utf8()];
    let value: i64 = digits.parse().ok()?;
    let unit_secs = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return None,
    };
    TimeDelta::try_seconds(value.checked_mul(unit_secs)?.checked_mul(sign)?)
}

fn print_help() {
    println!("Rendering:");
    println!("  text <when>       print the relative phrase for an instant");
    println!("  add <when>        render a fragment and insert it into the page");
    println!("  show              list the page's elements");
    println!("  clear             empty the page");
    println!();
    println!("  <when> is `now`, an offset like -90s -5m -3h +2d, or an");
    println!("  absolute timestamp like 2013-11-14T13:24:43Z");
    println!();
    println!("Configuration:");
    println!("  locale [code]     show or switch the locale (en, fr, de)");
    println!("  tag [name]        show or set the element tag");
    println!("  class [name]      show or set the live-marker class");
    println!("  interval <secs>   set the refresh interval");
    println!("  autostart on|off  arm auto-update from the first live fragment");
    println!();
    println!("Auto-update:");
    println!("  start             start the refresh loop");
    println!("  stop              stop the refresh loop");
    println!("  started           report whether the loop is running");
    println!("  refresh           run one refresh pass by hand");
    println!("  watch             live view, refreshed on every tick (Ctrl-C quits)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset_units() {
        assert_eq!(parse_offset("-90s"), Some(TimeDelta::seconds(-90)));
        assert_eq!(parse_offset("-5m"), Some(TimeDelta::seconds(-300)));
        assert_eq!(parse_offset("-3h"), Some(TimeDelta::seconds(-10_800)));
        assert_eq!(parse_offset("+2d"), Some(TimeDelta::seconds(172_800)));
    }

    #[test]
    fn test_parse_offset_rejects_malformed_input() {
        assert_eq!(parse_offset("5m"), None, "A sign is required");
        assert_eq!(parse_offset("-5"), None, "A unit is required");
        assert_eq!(parse_offset("-5w"), None, "Unknown unit");
        assert_eq!(parse_offset("-m"), None, "Digits are required");
        assert_eq!(parse_offset("-5é"), None);
        assert_eq!(parse_offset("-"), None);
        assert_eq!(parse_offset(""), None);
    }

    #[test]
    fn test_parse_instant_forms() {
        assert!(parse_instant("now").is_some());
        assert!(parse_instant("NOW").is_some());
        assert!(parse_instant("-5m").is_some());
        assert!(parse_instant("2013-11-14T13:24:43Z").is_some());
        assert_eq!(parse_instant(""), None);
        assert_eq!(parse_instant("soonish"), None);
    }

    #[test]
    fn test_parse_instant_rejects_offsets_outside_the_date_range() {
        // Big enough for a TimeDelta, too big for a DateTime.
        assert_eq!(parse_instant("+9000000000000000s"), None);
        assert_eq!(parse_instant("-9000000000000000s"), None);
    }
}
