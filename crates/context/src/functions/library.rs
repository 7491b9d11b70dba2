//! The standard `assay:` function library.

use super::FunctionLibrary;
use crate::context::TestContext;
use crate::error::ContextError;
use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use rand::Rng;
use regex::Regex;
use std::fmt::Write;

pub const STANDARD_PREFIX: &str = "assay:";

const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

type FunctionResult = Result<String, ContextError>;

pub fn standard_library() -> FunctionLibrary {
    FunctionLibrary::new("assay-functions", STANDARD_PREFIX)
        .with_function("concat", concat)
        .with_function("upperCase", upper_case)
        .with_function("lowerCase", lower_case)
        .with_function("substring", substring)
        .with_function("stringLength", string_length)
        .with_function("substringBefore", substring_before)
        .with_function("substringAfter", substring_after)
        .with_function("translate", translate)
        .with_function("round", round)
        .with_function("floor", floor)
        .with_function("ceiling", ceiling)
        .with_function("abs", abs)
        .with_function("sum", sum)
        .with_function("max", max)
        .with_function("min", min)
        .with_function("average", average)
        .with_function("randomNumber", random_number)
        .with_function("randomString", random_string)
        .with_function("currentDate", current_date)
        .with_function("escapeXml", escape_xml)
        .with_function("cdataSection", cdata_section)
}

fn arguments_error(function: &str, message: impl Into<String>) -> ContextError {
    ContextError::FunctionArguments {
        function: function.to_string(),
        message: message.into(),
    }
}

fn expect_args<'a>(
    function: &str,
    args: &'a [String],
    min: usize,
    max: usize,
) -> Result<&'a [String], ContextError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(arguments_error(
            function,
            format!("expected {} argument(s), got {}", expected, args.len()),
        ));
    }
    Ok(args)
}

fn parse_number(function: &str, value: &str) -> Result<f64, ContextError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| arguments_error(function, format!("'{}' is not a number", value)))
}

fn parse_count(function: &str, value: &str) -> Result<usize, ContextError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| arguments_error(function, format!("'{}' is not a valid length", value)))
}

fn parse_flag(function: &str, value: &str) -> Result<bool, ContextError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(arguments_error(
            function,
            format!("'{}' is not a boolean", other),
        )),
    }
}

fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn numbers(function: &str, args: &[String]) -> Result<Vec<f64>, ContextError> {
    expect_args(function, args, 1, usize::MAX)?
        .iter()
        .map(|a| parse_number(function, a))
        .collect()
}

fn concat(args: &[String], _ctx: &TestContext) -> FunctionResult {
    Ok(expect_args("concat", args, 1, usize::MAX)?.concat())
}

fn upper_case(args: &[String], _ctx: &TestContext) -> FunctionResult {
    Ok(expect_args("upperCase", args, 1, 1)?[0].to_uppercase())
}

fn lower_case(args: &[String], _ctx: &TestContext) -> FunctionResult {
    Ok(expect_args("lowerCase", args, 1, 1)?[0].to_lowercase())
}

/// `substring(text, begin[, end])` with zero-based character indices.
fn substring(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let args = expect_args("substring", args, 2, 3)?;
    let chars: Vec<char> = args[0].chars().collect();
    let begin = parse_count("substring", &args[1])?;
    let end = match args.get(2) {
        Some(end) => parse_count("substring", end)?,
        None => chars.len(),
    };
    if begin > end || end > chars.len() {
        return Err(arguments_error(
            "substring",
            format!(
                "range {}..{} is out of bounds for length {}",
                begin,
                end,
                chars.len()
            ),
        ));
    }
    Ok(chars[begin..end].iter().collect())
}

fn string_length(args: &[String], _ctx: &TestContext) -> FunctionResult {
    Ok(expect_args("stringLength", args, 1, 1)?[0]
        .chars()
        .count()
        .to_string())
}

/// Text before the first separator, or the whole text when it does not occur.
fn substring_before(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let args = expect_args("substringBefore", args, 2, 2)?;
    Ok(match args[0].find(args[1].as_str()) {
        Some(index) => args[0][..index].to_string(),
        None => args[0].clone(),
    })
}

/// Text after the first separator, or an empty string when it does not occur.
fn substring_after(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let args = expect_args("substringAfter", args, 2, 2)?;
    Ok(match args[0].find(args[1].as_str()) {
        Some(index) => args[0][index + args[1].len()..].to_string(),
        None => String::new(),
    })
}

/// `translate(text, regex, replacement)` replaces every match.
fn translate(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let args = expect_args("translate", args, 3, 3)?;
    let regex = Regex::new(&args[1]).map_err(|e| arguments_error("translate", e.to_string()))?;
    Ok(regex.replace_all(&args[0], args[2].as_str()).into_owned())
}

fn round(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let value = parse_number("round", &expect_args("round", args, 1, 1)?[0])?;
    Ok(format_number(value.round()))
}

fn floor(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let value = parse_number("floor", &expect_args("floor", args, 1, 1)?[0])?;
    Ok(format_number(value.floor()))
}

fn ceiling(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let value = parse_number("ceiling", &expect_args("ceiling", args, 1, 1)?[0])?;
    Ok(format_number(value.ceil()))
}

fn abs(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let value = parse_number("abs", &expect_args("abs", args, 1, 1)?[0])?;
    Ok(format_number(value.abs()))
}

fn sum(args: &[String], _ctx: &TestContext) -> FunctionResult {
    Ok(format_number(numbers("sum", args)?.iter().sum()))
}

fn max(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let values = numbers("max", args)?;
    Ok(format_number(values.into_iter().fold(f64::NEG_INFINITY, f64::max)))
}

fn min(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let values = numbers("min", args)?;
    Ok(format_number(values.into_iter().fold(f64::INFINITY, f64::min)))
}

fn average(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let values = numbers("average", args)?;
    let total: f64 = values.iter().sum();
    Ok(format_number(total / values.len() as f64))
}

/// `randomNumber(length[, leadingZeros])`. Without `leadingZeros` the first digit is never 0.
fn random_number(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let args = expect_args("randomNumber", args, 1, 2)?;
    let length = parse_count("randomNumber", &args[0])?;
    if length == 0 {
        return Err(arguments_error("randomNumber", "length must be positive"));
    }
    let leading_zeros = match args.get(1) {
        Some(flag) => parse_flag("randomNumber", flag)?,
        None => false,
    };

    let mut rng = rand::rng();
    let digits = (0..length)
        .map(|i| {
            let lowest = if i == 0 && !leading_zeros { 1 } else { 0 };
            char::from(DIGITS[rng.random_range(lowest..DIGITS.len())])
        })
        .collect();
    Ok(digits)
}

/// `randomString(length[, UPPERCASE|LOWERCASE|MIXED[, includeNumbers]])`.
fn random_string(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let args = expect_args("randomString", args, 1, 3)?;
    let length = parse_count("randomString", &args[0])?;
    let mut alphabet: Vec<u8> = match args.get(1).map(|m| m.trim()) {
        None | Some("MIXED") => [UPPERCASE, LOWERCASE].concat(),
        Some("UPPERCASE") => UPPERCASE.to_vec(),
        Some("LOWERCASE") => LOWERCASE.to_vec(),
        Some(other) => {
            return Err(arguments_error(
                "randomString",
                format!("unknown notation '{}'", other),
            ));
        }
    };
    if let Some(flag) = args.get(2)
        && parse_flag("randomString", flag)?
    {
        alphabet.extend_from_slice(DIGITS);
    }

    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect())
}

/// `currentDate([format])` using strftime syntax, `%d.%m.%Y` by default.
fn current_date(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let args = expect_args("currentDate", args, 0, 1)?;
    let format = args.first().map_or(DEFAULT_DATE_FORMAT, |f| f.as_str());
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(arguments_error(
            "currentDate",
            format!("invalid date format '{}'", format),
        ));
    }

    let mut out = String::new();
    write!(out, "{}", Local::now().format_with_items(items.iter()))
        .map_err(|e| arguments_error("currentDate", e.to_string()))?;
    Ok(out)
}

fn escape_xml(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let text = &expect_args("escapeXml", args, 1, 1)?[0];
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Ok(escaped)
}

fn cdata_section(args: &[String], _ctx: &TestContext) -> FunctionResult {
    let text = &expect_args("cdataSection", args, 1, 1)?[0];
    Ok(format!("<![CDATA[{}]]>", text))
}
