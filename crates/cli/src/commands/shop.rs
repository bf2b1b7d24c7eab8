//! Interactive shopping session: one command per input line, one full redraw
//! per state change.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_core::pricing::snapshot;
use storefront_core::view::{EventOutcome, PageRenderer, Storefront, UiEvent};
use storefront_core::{CartSummary, ProductId};
use tracing::info;

pub const HELP: &str = "\
commands:
  products            show the product list (closes the cart)
  cart                show the cart
  details <id>        open a product's details
  qty <n>             set the quantity in the open details
  add [n]             add the open product to the cart
  close               close the details
  inc <id>            one more of a product in the cart
  dec <id>            one less (removes the line at 1)
  set <id> <n>        set a cart line's quantity (0 removes)
  rm <id>             remove a product from the cart
  export              print the cart as JSON
  help                show this help
  quit                leave the shop";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Events(Vec<UiEvent>),
    Export,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionReport {
    pub events: usize,
    pub alerts: usize,
    pub summary: CartSummary,
}

pub fn parse_command(input: &str) -> ShellCommand {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match (verb.as_str(), args.as_slice()) {
        ("products" | "close-cart", []) => ShellCommand::Events(vec![UiEvent::CloseCart]),
        ("cart" | "view-cart", []) => ShellCommand::Events(vec![UiEvent::ViewCart]),
        ("details" | "view", [id]) => with_product(id, |id| vec![UiEvent::ViewDetails(id)]),
        ("qty", rest) => ShellCommand::Events(vec![UiEvent::SetQuantity(rest.join(" "))]),
        ("add", []) => ShellCommand::Events(vec![UiEvent::AddToCart]),
        ("add", rest) => ShellCommand::Events(vec![
            UiEvent::SetQuantity(rest.join(" ")),
            UiEvent::AddToCart,
        ]),
        ("close", []) => ShellCommand::Events(vec![UiEvent::CloseDetails]),
        ("inc" | "+", [id]) => with_product(id, |id| vec![UiEvent::Increment(id)]),
        ("dec" | "-", [id]) => with_product(id, |id| vec![UiEvent::Decrement(id)]),
        ("rm" | "remove", [id]) => with_product(id, |id| vec![UiEvent::Remove(id)]),
        ("set", [id, quantity]) => match quantity.parse::<u32>() {
            Ok(quantity) => {
                with_product(id, |id| vec![UiEvent::SetLineQuantity(id, quantity)])
            }
            Err(_) => ShellCommand::Invalid(format!("`{quantity}` is not a quantity")),
        },
        ("export", []) => ShellCommand::Export,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", []) => ShellCommand::Quit,
        _ => ShellCommand::Invalid(format!("unknown command `{trimmed}` (type `help`)")),
    }
}

fn with_product<F>(raw: &str, build: F) -> ShellCommand
where
    F: FnOnce(ProductId) -> Vec<UiEvent>,
{
    match raw.trim_start_matches('#').parse::<u32>() {
        Ok(id) => ShellCommand::Events(build(ProductId(id))),
        Err(_) => ShellCommand::Invalid(format!("`{raw}` is not a product id")),
    }
}

pub fn run(options: LoadOptions) -> Result<SessionReport> {
    let config = AppConfig::load(options).context("loading configuration")?;
    let catalog = config.load_catalog().context("loading catalog")?;
    let renderer = PageRenderer::new(&config.display.title, &config.display.currency_symbol)
        .context("compiling page templates")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(Storefront::new(catalog), &renderer, stdin.lock(), stdout.lock())
}

pub fn run_session<R, W>(
    mut store: Storefront,
    renderer: &PageRenderer,
    input: R,
    mut output: W,
) -> Result<SessionReport>
where
    R: BufRead,
    W: Write,
{
    let mut report = SessionReport { events: 0, alerts: 0, summary: store.summary() };

    writeln!(output, "{}", renderer.render(&store)?)?;
    prompt(&mut output)?;

    for line in input.lines() {
        let line = line.context("reading input")?;

        match parse_command(&line) {
            ShellCommand::Events(events) => {
                let mut redraw = false;
                for event in events {
                    report.events += 1;
                    match store.dispatch(event) {
                        EventOutcome::Redraw => redraw = true,
                        EventOutcome::Ignored => {}
                        EventOutcome::Alert(error) => {
                            report.alerts += 1;
                            writeln!(output, "! {}", error.user_message())?;
                        }
                    }
                }
                if redraw {
                    writeln!(output, "{}", renderer.render(&store)?)?;
                }
            }
            ShellCommand::Export => {
                let json = serde_json::to_string_pretty(&snapshot(store.cart()))?;
                writeln!(output, "{json}")?;
            }
            ShellCommand::Help => writeln!(output, "{HELP}")?,
            ShellCommand::Quit => break,
            ShellCommand::Empty => {}
            ShellCommand::Invalid(message) => writeln!(output, "? {message}")?,
        }

        prompt(&mut output)?;
    }

    writeln!(output)?;
    report.summary = store.summary();
    info!(
        event_name = "shop.session_finished",
        events = report.events,
        alerts = report.alerts,
        item_count = report.summary.item_count,
        total = %report.summary.total,
        "shopping session finished"
    );
    Ok(report)
}

fn prompt<W: Write>(output: &mut W) -> Result<()> {
    write!(output, "> ")?;
    output.flush()?;
    Ok(())
}
