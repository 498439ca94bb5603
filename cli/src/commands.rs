use std::fs;

use command_flags_core::{Application, Context, FlagDefinition, Separator};
use tracing::{debug, warn};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registers every demo command.
pub fn build_app() -> Application {
    let mut app = Application::new(
        "flagdemo",
        &format!("Typed sub-command flags demo (v{PACKAGE_VERSION})"),
        "command-flags contributors",
    );

    app.add_cmd("greet", "Print a greeting", |ctx| report(ctx, run_greet))
        .add_flag(FlagDefinition::string("name", "Who to greet").required())
        .add_flag(FlagDefinition::boolean("shout", "Print in upper case"));

    app.add_cmd("sum", "Add up a list of integers", |ctx| report(ctx, run_sum))
        .add_flag(
            FlagDefinition::int("values", "Comma-separated integers")
                .required()
                .allow_many(),
        );

    app.add_cmd("stat", "Print the size of a file", |ctx| report(ctx, run_stat))
        .add_flag(
            FlagDefinition::path("file", "File to inspect")
                .required()
                .must_exist(),
        );

    app.add_cmd("inspect", "Print the validated flags", |ctx| {
        report(ctx, run_inspect)
    })
    .add_flag(
        FlagDefinition::alphanumeric("tags", "Semicolon-separated tags")
            .allow_many()
            .separator(Separator::SemiColon)
            .allow_underscore()
            .allow_dots(),
    )
    .add_flag(FlagDefinition::float("ratio", "A ratio such as 0.5"))
    .add_flag(FlagDefinition::boolean("json", "Print as JSON"));

    app
}

/// Runs a handler body, printing its error to stderr and mapping it to
/// exit code 1.
fn report(ctx: &mut Context<'_>, body: fn(&mut Context<'_>) -> Result<(), String>) -> i32 {
    match body(ctx) {
        Ok(()) => 0,
        Err(err) => {
            if let Err(e) = writeln!(ctx.stderr(), "error: {err}") {
                warn!("failed to write handler error: {e}");
            }
            1
        }
    }
}

fn run_greet(ctx: &mut Context<'_>) -> Result<(), String> {
    let mut greeting = format!("Hello, {}!", ctx.flag("name"));
    if ctx.flag("shout") == "true" {
        greeting = greeting.to_uppercase();
    }
    writeln!(ctx.stdout(), "{greeting}").map_err(|err| err.to_string())
}

fn run_sum(ctx: &mut Context<'_>) -> Result<(), String> {
    let values = split_list(ctx.flag("values"), Separator::Comma);
    let mut total: u128 = 0;
    for value in &values {
        let n: u128 = value
            .parse()
            .map_err(|err| format!("Failed to parse '{value}': {err}"))?;
        total = total
            .checked_add(n)
            .ok_or_else(|| "Sum overflows".to_string())?;
    }
    debug!(count = values.len(), total = %total, "summed values");
    writeln!(ctx.stdout(), "{total}").map_err(|err| err.to_string())
}

fn run_stat(ctx: &mut Context<'_>) -> Result<(), String> {
    let path = ctx.flag("file");
    let metadata =
        fs::metadata(path).map_err(|err| format!("Failed to read metadata of '{path}': {err}"))?;
    writeln!(ctx.stdout(), "{path}: {} bytes", metadata.len()).map_err(|err| err.to_string())
}

fn run_inspect(ctx: &mut Context<'_>) -> Result<(), String> {
    let flags = ctx.flags();
    if ctx.flag("json") == "true" {
        let json = serde_json::to_string_pretty(flags)
            .map_err(|err| format!("Failed to serialize flags: {err}"))?;
        return writeln!(ctx.stdout(), "{json}").map_err(|err| err.to_string());
    }

    for (name, value) in flags.iter() {
        writeln!(ctx.stdout(), "{name}={value}").map_err(|err| err.to_string())?;
    }
    for tag in split_list(ctx.flag("tags"), Separator::SemiColon) {
        writeln!(ctx.stdout(), "tag: {tag}").map_err(|err| err.to_string())?;
    }
    Ok(())
}

/// Splits a validated multi-value flag; an empty value yields no items.
fn split_list(value: &str, separator: Separator) -> Vec<&str> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(separator.as_char()).collect()
}
