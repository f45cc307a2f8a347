/*
Copyright 2025 the mm14asm authors

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::lexer::{self, IdentifierPosition};

/// Splits `text` into words separated by exactly one comma each (commas may
/// be surrounded by whitespace). Rejects a leading comma, a trailing
/// comma, and two consecutive commas.
pub fn split_comma_list(text: &str) -> Result<Vec<&str>, String> {
    let mut words = Vec::new();
    let mut rest = text.trim_start();

    if rest.is_empty() {
        return Err("expected at least one operand".to_string());
    }

    loop {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == ',')
            .unwrap_or(rest.len());
        let (word, tail) = rest.split_at(end);
        if word.is_empty() {
            return Err("unexpected comma".to_string());
        }
        words.push(word);

        rest = tail.trim_start();
        if rest.is_empty() {
            break;
        }

        match rest.strip_prefix(',') {
            Some(after_comma) => {
                let probe = after_comma.trim_start();
                if probe.is_empty() {
                    return Err("trailing comma".to_string());
                }
                if probe.starts_with(',') {
                    return Err("unexpected comma".to_string());
                }
                rest = probe;
            }
            None => return Err("expected a comma between operands".to_string()),
        }
    }

    Ok(words)
}

/// Parses the operand words of an already-classified directive or
/// instruction head, checking the word count matches `expected` exactly.
/// Returns the contract-bearing trailing-text message on overflow.
pub fn split_exact(text: &str, expected: usize) -> Result<Vec<&str>, String> {
    let trimmed = text.trim();
    if expected == 0 {
        return if trimmed.is_empty() {
            Ok(Vec::new())
        } else {
            Err("unexpected characters after operands".to_string())
        };
    }

    let words = split_comma_list(text)?;
    if words.len() > expected {
        return Err("unexpected characters after operands".to_string());
    }
    if words.len() < expected {
        return Err("expected at least one operand".to_string());
    }
    Ok(words)
}

/// Parses a `.define NAME = N` body, given the text after the `.define`
/// head word.
pub fn parse_define_body(rest: &str) -> Result<(String, i16), String> {
    let mut cursor = rest;

    let name_word =
        lexer::next_word(&mut cursor).ok_or_else(|| "expected a constant name".to_string())?;
    let name = lexer::is_identifier(name_word, IdentifierPosition::Operand)
        .ok_or_else(|| format!("'{name_word}' is not a valid constant name"))?
        .to_string();

    let eq_word = lexer::next_word(&mut cursor)
        .ok_or_else(|| "expected '=' after constant name".to_string())?;
    if eq_word != "=" {
        return Err("expected '=' after constant name".to_string());
    }

    let value_word =
        lexer::next_word(&mut cursor).ok_or_else(|| "expected a value after '='".to_string())?;
    let value = lexer::is_valid_number(value_word)
        .ok_or_else(|| format!("'{value_word}' is not a valid number"))?;

    if lexer::next_word(&mut cursor).is_some() {
        return Err("unexpected characters after operands".to_string());
    }

    Ok((name, value))
}

/// Parses a `.string "..."` operand, returning the character codes between
/// the quotes (exclusive).
pub fn parse_string_operand(text: &str) -> Result<Vec<u8>, String> {
    let trimmed = text.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('"') || !trimmed.ends_with('"') {
        return Err("string operand must be wrapped in double quotes".to_string());
    }
    let body = &trimmed[1..trimmed.len() - 1];
    if !body.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
        return Err("string operand must contain only printable characters".to_string());
    }
    Ok(body.bytes().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_comma_list_trims_surrounding_whitespace() {
        assert_eq!(split_comma_list(" 5 ,  -3 , 7 ").unwrap(), vec!["5", "-3", "7"]);
    }

    #[test]
    fn split_comma_list_rejects_a_leading_comma() {
        let err = split_comma_list(", 5, 6").unwrap_err();
        assert_eq!(err, "unexpected comma");
    }

    #[test]
    fn split_comma_list_rejects_a_trailing_comma() {
        let err = split_comma_list("5, 6,").unwrap_err();
        assert_eq!(err, "trailing comma");
    }

    #[test]
    fn split_comma_list_rejects_a_double_comma() {
        let err = split_comma_list("5,, 6").unwrap_err();
        assert_eq!(err, "unexpected comma");
    }

    #[test]
    fn split_comma_list_rejects_missing_commas() {
        let err = split_comma_list("5 6").unwrap_err();
        assert_eq!(err, "expected a comma between operands");
    }

    #[test]
    fn split_comma_list_rejects_empty_input() {
        let err = split_comma_list("   ").unwrap_err();
        assert_eq!(err, "expected at least one operand");
    }

    #[test]
    fn split_exact_zero_rejects_trailing_text() {
        let err = split_exact("r1", 0).unwrap_err();
        assert_eq!(err, "unexpected characters after operands");
    }

    #[test]
    fn split_exact_accepts_the_exact_count() {
        assert_eq!(split_exact("r1, r2", 2).unwrap(), vec!["r1", "r2"]);
    }

    #[test]
    fn parse_define_body_requires_an_equals_sign() {
        let err = parse_define_body("K 4").unwrap_err();
        assert_eq!(err, "expected '=' after constant name");
    }

    #[test]
    fn parse_define_body_rejects_a_non_numeric_value() {
        let err = parse_define_body("K = four").unwrap_err();
        assert!(err.contains("not a valid number"));
    }

    #[test]
    fn parse_define_body_parses_a_negative_value() {
        assert_eq!(parse_define_body("K = -4").unwrap(), ("K".to_string(), -4));
    }

    #[test]
    fn parse_string_operand_requires_both_quotes() {
        let err = parse_string_operand("\"unterminated").unwrap_err();
        assert!(err.contains("double quotes"));
    }

    #[test]
    fn parse_string_operand_strips_the_quotes() {
        assert_eq!(parse_string_operand("\"hi\"").unwrap(), b"hi".to_vec());
    }
}
