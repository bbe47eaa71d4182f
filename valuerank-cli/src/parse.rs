/// Parsing of the user's typed answers.
///
/// Everything here is pure: bad input comes back as an `Err(message)` and the
/// caller re-prompts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairAnswer {
    First,
    Second,
    Skip,
    Quit,
}

/// Positions are 0-based into the set as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetAnswer {
    Pick { most: usize, least: usize },
    Quit,
}

fn is_quit(input: &str) -> bool {
    matches!(input, "q" | "quit" | "exit")
}

/// "1" / "2" pick a side, "s" skips, "q" saves and quits.
pub fn parse_pair_answer(input: &str) -> Result<PairAnswer, String> {
    let input = input.trim().to_ascii_lowercase();
    match input.as_str() {
        "1" | "a" => Ok(PairAnswer::First),
        "2" | "b" => Ok(PairAnswer::Second),
        "s" | "skip" | "?" => Ok(PairAnswer::Skip),
        other if is_quit(other) => Ok(PairAnswer::Quit),
        _ => Err(format!("Type 1 or 2 to choose, s if you can't decide, q to quit (got \"{input}\")")),
    }
}

/// Two 1-based positions, most important first: "2 5", "2,5" or "25".
pub fn parse_set_answer(input: &str, set_len: usize) -> Result<SetAnswer, String> {
    let input = input.trim().to_ascii_lowercase();
    if is_quit(&input) {
        return Ok(SetAnswer::Quit);
    }

    let parts: Vec<&str> = if input.contains(|c: char| c == ',' || c.is_whitespace()) {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect()
    } else if input.chars().count() == 2 {
        let split = input.char_indices().nth(1).map_or(input.len(), |(i, _)| i);
        vec![&input[..split], &input[split..]]
    } else {
        vec![input.as_str()]
    };

    let [most, least] = parts.as_slice() else {
        return Err("Enter two numbers: the most important, then the least important (e.g. \"2 5\")".to_string());
    };
    let most = parse_position(most, set_len)?;
    let least = parse_position(least, set_len)?;
    if most == least {
        return Err("Most and least important must be different values".to_string());
    }
    Ok(SetAnswer::Pick { most, least })
}

fn parse_position(token: &str, set_len: usize) -> Result<usize, String> {
    match token.parse::<usize>() {
        Ok(n) if (1..=set_len).contains(&n) => Ok(n - 1),
        _ => Err(format!("\"{token}\" is not a number between 1 and {set_len}")),
    }
}

/// Empty input keeps the default rating.
pub fn parse_rating(input: &str) -> Result<Option<u8>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<u8>() {
        Ok(n) if (1..=10).contains(&n) => Ok(Some(n)),
        _ => Err(format!("Rating must be a whole number from 1 to 10 (got \"{input}\")")),
    }
}

/// `--custom "NAME=description"`. The name is upper-cased like the built-in values.
pub fn parse_custom(spec: &str) -> Result<(String, String), String> {
    let (name, description) = spec.split_once('=').unwrap_or((spec, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Custom value \"{spec}\" needs a name, e.g. \"CRAFT=to make things well\""));
    }
    Ok((name.to_uppercase(), description.trim().to_string()))
}

/// Load extra values from a file: a JSON array of "NAME=description" strings,
/// or plain text with one per line.
pub fn parse_custom_list(content: &str) -> Result<Vec<String>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let entries: Vec<String> = serde_json::from_str(trimmed)
            .map_err(|e| format!("File looks like JSON but failed to parse: {e}"))?;
        Ok(entries.into_iter().filter(|s| !s.trim().is_empty()).collect())
    } else {
        Ok(trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty() && !s.starts_with('#'))
            .collect())
    }
}
