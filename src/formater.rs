use std::fmt::{self, Write};

/// Width of the `////` banner lines in generated C.
const RULE_WIDTH: usize = 80;

/// Entries per line of a C array initializer row.
const ARRAY_COLUMNS: usize = 4;

pub fn snake_case(name: &str) -> String {
    // input is all uppercase letters
    let all_upper = name.chars().all(|c| {
        if c.is_alphabetic() {
            c.is_uppercase()
        } else {
            true
        }
    });
    // if the input is all uppercase letters, just convert directly into
    // lowercase
    if all_upper {
        return name.to_lowercase();
    }

    let mut output = String::new();
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        output.extend(first.to_lowercase());
    }

    for letter in chars {
        if letter.is_uppercase() {
            output.push('_');
            output.extend(letter.to_lowercase());
        } else {
            output.push(letter)
        }
    }

    output
}

/// Writes an 80 column `/` rule, the `title` lines as `//` comments and
/// a closing rule.
pub fn banner(out: &mut String, title: &[&str]) -> fmt::Result {
    let rule = "/".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    for line in title {
        writeln!(out, "// {line}")?;
    }
    writeln!(out, "{rule}")
}

pub fn comment(out: &mut String, lines: &[&str]) -> fmt::Result {
    for line in lines {
        writeln!(out, "// {line}")?;
    }
    Ok(())
}

/// `#define NAME<pad>(reg32)0xADDR`, the value starting at column `width`
/// counted from the start of the name.
pub fn define(out: &mut String, name: &str, width: usize, addr: u32) -> fmt::Result {
    writeln!(out, "#define {name:<width$}(reg32)0x{addr:X}")
}

/// Column shared by a set of `#define` names: two spaces past the longest.
pub fn define_width<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names.into_iter().map(str::len).max().unwrap_or(0) + 2
}

/// One brace-nested row of a two dimensional array initializer, entries
/// aligned in columns of four.
pub fn array_row(out: &mut String, entries: &[&str]) -> fmt::Result {
    let width = entries.iter().map(|e| e.len() + 1).max().unwrap_or(0) + 2;
    writeln!(out, "    {{")?;
    for line in entries.chunks(ARRAY_COLUMNS) {
        let mut text = String::from("        ");
        for entry in line {
            write!(text, "{:<width$}", format!("{entry},"))?;
        }
        writeln!(out, "{}", text.trim_end())?;
    }
    writeln!(out, "    }},")
}
