use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::session::PointSlot;

use super::registry::find_command_spec;
use super::types::Command;

pub fn parse_command_text(input: &str) -> AppResult<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_argument("command must not be empty"));
    }

    let (id, args_text) = match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim_start()),
        None => (trimmed, ""),
    };

    if find_command_spec(id).is_none() {
        return Err(AppError::invalid_argument(format!("unknown command: {id}")));
    }

    match id {
        "open" => parse_open(args_text),
        "start" => parse_point(PointSlot::Start, args_text),
        "end" => parse_point(PointSlot::End, args_text),
        "distance" => parse_text_value(id, args_text)
            .map(|value| Command::SetPhysicalDistance { value }),
        "scale" => {
            parse_text_value(id, args_text).map(|value| Command::SetDesiredScale { value })
        }
        "export" => parse_no_args(id, args_text, Command::Export),
        "save" => Ok(Command::Save {
            path: (!args_text.is_empty()).then(|| PathBuf::from(args_text)),
        }),
        "preview" => parse_no_args(id, args_text, Command::TogglePreview),
        "zoom" => parse_zoom(args_text),
        "quit" => parse_no_args(id, args_text, Command::Quit),
        _ => Err(AppError::unsupported(
            "command parser is out of sync with registry",
        )),
    }
}

fn parse_no_args(id: &str, args_text: &str, cmd: Command) -> AppResult<Command> {
    if args_text.is_empty() {
        return Ok(cmd);
    }
    Err(AppError::invalid_argument(format!(
        "{id} does not accept arguments"
    )))
}

fn parse_open(args_text: &str) -> AppResult<Command> {
    if args_text.is_empty() {
        return Err(AppError::invalid_argument(
            "open requires 1 argument: path",
        ));
    }
    Ok(Command::OpenImage {
        path: PathBuf::from(args_text),
    })
}

/// Accepts `x y`, `x,y`, or `x, y`.
fn parse_point(slot: PointSlot, args_text: &str) -> AppResult<Command> {
    let (x, y) = parse_pair(args_text).ok_or_else(|| {
        AppError::invalid_argument(format!("{} requires 2 arguments: x y", slot.name()))
    })?;
    Ok(Command::MarkAt { slot, x, y })
}

pub fn parse_pair(text: &str) -> Option<(f64, f64)> {
    let mut parts = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((x, y))
}

fn parse_text_value(id: &str, args_text: &str) -> AppResult<String> {
    if args_text.is_empty() {
        return Err(AppError::invalid_argument(format!(
            "{id} requires 1 argument"
        )));
    }
    Ok(args_text.to_string())
}

fn parse_zoom(args_text: &str) -> AppResult<Command> {
    let mut parts = args_text.split_whitespace();
    let Some(value_text) = parts.next() else {
        return Err(AppError::invalid_argument(
            "zoom requires 1 argument: factor",
        ));
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument("zoom accepts exactly 1 argument"));
    }

    let value = value_text
        .parse::<f64>()
        .map_err(|_| AppError::invalid_argument("zoom factor must be a number"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::invalid_argument("zoom factor must be positive"));
    }
    Ok(Command::SetZoom { value })
}
