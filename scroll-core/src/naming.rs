//! Naming conventions for library files: display titles, line ids, urls and
//! slugs. Also exposed to templates as tera filters.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tera::{Tera, Value};

static LINE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Line_(\d{5})").expect("valid line id pattern"));
static FILE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)_(Source|Rendering|Reflections|Lens)\.txt$").expect("valid file type pattern")
});

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title shown for a line file, e.g. `Genesis 1 – Line 00001`.
pub fn display_title(book: &str, chapter: &str, filename: &str) -> String {
    let chapter = chapter.strip_prefix('0').unwrap_or(chapter);
    if filename.ends_with("-translation.txt") {
        format!("{} {} – Translation", capitalize(book), chapter)
    } else {
        let number: String = filename.chars().skip(5).take(5).collect();
        format!("{} {} – Line {}", capitalize(book), chapter, number)
    }
}

/// The five digit id from `Line_00001_Source`, or an empty string.
pub fn line_id(basename: &str) -> &str {
    LINE_ID
        .captures(basename)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

pub fn pad5(n: u64) -> String {
    format!("{n:05}")
}

/// `Source`, `Rendering`, `Reflections` or `Lens` as written in the filename.
pub fn file_type(filename: &str) -> &str {
    FILE_TYPE
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

pub fn txt_url(book: &str, chapter: &str, basename: &str) -> String {
    format!("/library/{book}/{chapter}/{basename}/")
}

/// Lower-case ASCII slug; runs of anything else collapse into one `-`.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Register the naming helpers as tera filters and functions.
pub fn register(tera: &mut Tera) {
    tera.register_filter("line_id", line_id_filter);
    tera.register_filter("pad5", pad5_filter);
    tera.register_filter("file_type", file_type_filter);
    tera.register_filter("capitalize_first", capitalize_filter);
    tera.register_filter("slugify", slugify_filter);
    tera.register_function("txt_url", txt_url_function);
}

fn string_arg<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("`{filter}` expects a string, got {value}")))
}

fn line_id_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    // Accepts a bare name or a file record carrying `basename`/`filename`.
    let name = match value {
        Value::Object(map) => map
            .get("basename")
            .or_else(|| map.get("filename"))
            .and_then(Value::as_str)
            .unwrap_or(""),
        Value::String(s) => s.as_str(),
        _ => "",
    };
    Ok(Value::String(line_id(name).to_string()))
}

fn pad5_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let n = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(Value::String(n.map(pad5).unwrap_or_default()))
}

fn file_type_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value.as_str().unwrap_or("");
    Ok(Value::String(file_type(name).to_string()))
}

fn capitalize_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(capitalize(string_arg(value, "capitalize_first")?)))
}

fn slugify_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(slugify(string_arg(value, "slugify")?)))
}

fn txt_url_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let arg = |name: &str| {
        args.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg(format!("`txt_url` needs a string `{name}` argument")))
    };
    Ok(Value::String(txt_url(arg("book")?, arg("chapter")?, arg("basename")?)))
}
