use treedo_render_common::TextMeasurer;
use treedo_ui_graphics::Font;

const ELLIPSIS: &str = "...";

/// Splits `text` into at most `max_lines` lines no wider than `max_width`.
///
/// Words are separated on spaces and placed greedily. A single word wider
/// than `max_width` is cut into hyphenated chunks first. When text is left
/// over after the last line, that line is shortened until it fits with a
/// trailing `"..."`.
pub fn wrap_text<M>(measurer: &M, text: &str, font: &Font, max_width: f32, max_lines: usize) -> Vec<String>
where
    M: TextMeasurer + ?Sized,
{
    let max_lines = max_lines.max(1);
    let width = |candidate: &str| measurer.measure_text_width(candidate, font);

    let mut tokens = Vec::new();
    for word in text.split(' ').filter(|word| !word.is_empty()) {
        if width(word) <= max_width {
            tokens.push(word.to_string());
        } else {
            split_long_word(word, &width, max_width, &mut tokens);
        }
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut truncated = false;
    for token in tokens {
        let proposed = if current.is_empty() {
            token.clone()
        } else {
            format!("{current} {token}")
        };
        if !current.is_empty() && width(&proposed) > max_width {
            lines.push(std::mem::replace(&mut current, token));
            if lines.len() == max_lines {
                truncated = true;
                break;
            }
        } else {
            current = proposed;
        }
    }
    if !truncated {
        lines.push(current);
    }

    if truncated {
        if let Some(last) = lines.last_mut() {
            while !last.is_empty() && width(&format!("{last}{ELLIPSIS}")) > max_width {
                last.pop();
            }
            let kept = last.trim_end().len();
            last.truncate(kept);
            last.push_str(ELLIPSIS);
        }
    }
    lines
}

fn split_long_word(word: &str, width: &impl Fn(&str) -> f32, max_width: f32, tokens: &mut Vec<String>) {
    let mut rest: Vec<char> = word.chars().collect();
    while !rest.is_empty() {
        let whole: String = rest.iter().collect();
        if width(&whole) <= max_width {
            tokens.push(whole);
            return;
        }
        let mut take = 1;
        while take < rest.len() {
            let candidate: String = rest[..take + 1].iter().chain(std::iter::once(&'-')).collect();
            if width(&candidate) > max_width {
                break;
            }
            take += 1;
        }
        let mut chunk: String = rest[..take].iter().collect();
        chunk.push('-');
        tokens.push(chunk);
        rest.drain(..take);
    }
}

#[cfg(test)]
#[path = "tests/text_tests.rs"]
mod tests;
