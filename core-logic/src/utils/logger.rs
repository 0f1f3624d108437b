use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Event target for positive outcomes, printed green.
pub const SUCCESS_TARGET: &str = "success";
/// Event target for per-account headers, printed magenta.
pub const ACCOUNT_TARGET: &str = "account";

/// Installs the console and rolling file layers.
///
/// The returned guard flushes the file writer and MUST be kept alive by
/// the caller.
pub fn setup_logger() -> Option<WorkerGuard> {
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::hourly("logs", "farmer");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_default(Level::INFO);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(file_filter);

    let console_filter = tracing_subscriber::filter::Targets::new()
        .with_default(Level::INFO);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // A subscriber may already exist (tests, embedding); keep it.
    installed.ok().map(|_| guard)
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn severity_style(level: &Level, target: &str) -> (Style, &'static str) {
    match *level {
        Level::ERROR => (Style::new().fg(Color::Red), "[!]"),
        Level::WARN => (Style::new().fg(Color::Yellow), "[*]"),
        _ if target == SUCCESS_TARGET => (Style::new().fg(Color::Green), "[*]"),
        _ if target == ACCOUNT_TARGET => (Style::new().fg(Color::Magenta), "[*]"),
        _ => (Style::new().fg(Color::Blue), "[*]"),
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut msg_visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut msg_visitor);

        let metadata = event.metadata();
        let (style, tag) = severity_style(metadata.level(), metadata.target());
        let timestamp = Local::now().format("%H:%M:%S");
        let line = format!("[{}] {} {}", timestamp, tag, msg_visitor.message);

        writeln!(writer, "{}", style.paint(line))
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;

        let mut msg_visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut msg_visitor);
        writeln!(writer, "{}", msg_visitor.message)
    }
}
